// src/db.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};

use crate::config::ForumConfig;
use crate::error::{ForumError, Result};
use crate::models::{NewPoll, Poll, PollOption};
use crate::store::{PollMutation, PollStore};

pub async fn create_pool(config: &ForumConfig) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| ForumError::config("DATABASE_URL must be set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS polls (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        ending_date TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS poll_options (
        id BIGSERIAL PRIMARY KEY,
        poll_id BIGINT NOT NULL REFERENCES polls (id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        votes_count INTEGER NOT NULL DEFAULT 0 CHECK (votes_count >= 0)
    )
    "#,
];

#[derive(Debug, sqlx::FromRow)]
struct PollRow {
    id: i64,
    title: String,
    ending_date: Option<DateTime<Utc>>,
}

impl PollRow {
    fn into_poll(self, options: Vec<PollOption>) -> Poll {
        Poll {
            id: self.id,
            title: self.title,
            ending_date: self.ending_date,
            options,
        }
    }
}

/// Poll store on Postgres.
#[derive(Debug, Clone)]
pub struct PgPollStore {
    pool: PgPool,
}

impl PgPollStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch_options(conn: &mut PgConnection, poll_id: i64) -> Result<Vec<PollOption>> {
        let options = sqlx::query_as::<_, PollOption>(
            "SELECT id, poll_id, name, votes_count FROM poll_options WHERE poll_id = $1 ORDER BY id",
        )
        .bind(poll_id)
        .fetch_all(conn)
        .await?;
        Ok(options)
    }

    async fn write_votes(conn: &mut PgConnection, poll: &Poll) -> Result<()> {
        for option in &poll.options {
            sqlx::query("UPDATE poll_options SET votes_count = $1 WHERE id = $2 AND poll_id = $3")
                .bind(option.votes_count)
                .bind(option.id)
                .bind(poll.id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PollStore for PgPollStore {
    async fn get(&self, id: i64) -> Result<Option<Poll>> {
        let mut tx = self.pool.begin().await?;

        // shared lock: no vote can commit between reading the poll and its options
        let row = sqlx::query_as::<_, PollRow>(
            "SELECT id, title, ending_date FROM polls WHERE id = $1 FOR SHARE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let poll = match row {
            Some(row) => {
                let options = Self::fetch_options(&mut tx, id).await?;
                Some(row.into_poll(options))
            }
            None => None,
        };
        tx.commit().await?;
        Ok(poll)
    }

    async fn create(&self, poll: NewPoll) -> Result<Poll> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PollRow>(
            "INSERT INTO polls (title, ending_date) VALUES ($1, $2) RETURNING id, title, ending_date",
        )
        .bind(&poll.title)
        .bind(poll.ending_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut options = Vec::with_capacity(poll.options.len());
        for name in &poll.options {
            let option = sqlx::query_as::<_, PollOption>(
                "INSERT INTO poll_options (poll_id, name) VALUES ($1, $2) \
                 RETURNING id, poll_id, name, votes_count",
            )
            .bind(row.id)
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;
            options.push(option);
        }

        tx.commit().await?;
        Ok(row.into_poll(options))
    }

    async fn update(&self, poll: &Poll) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE polls SET title = $1, ending_date = $2 WHERE id = $3")
            .bind(&poll.title)
            .bind(poll.ending_date)
            .bind(poll.id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(ForumError::poll_not_found(poll.id));
        }

        Self::write_votes(&mut tx, poll).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn modify<'a>(&'a self, id: i64, mutation: PollMutation<'a>) -> Result<Option<Poll>> {
        let mut tx = self.pool.begin().await?;

        // row lock keeps concurrent voters from losing each other's increments
        let row = sqlx::query_as::<_, PollRow>(
            "SELECT id, title, ending_date FROM polls WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let options = Self::fetch_options(&mut tx, id).await?;
        let mut poll = row.into_poll(options);
        let mut changed = poll.clone();
        if mutation(&mut changed) {
            Self::write_votes(&mut tx, &changed).await?;
            poll = changed;
        }

        tx.commit().await?;
        Ok(Some(poll))
    }
}
