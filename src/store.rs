// src/store.rs
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ForumError, Result};
use crate::models::{NewPoll, Poll, PollOption};

/// Change applied to a poll inside [`PollStore::modify`]. Returns `true` when
/// the poll was changed and has to be written back.
pub type PollMutation<'a> = Box<dyn FnOnce(&mut Poll) -> bool + Send + 'a>;

#[async_trait]
pub trait PollStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Poll>>;

    /// Saves a new poll and returns it with ids assigned.
    async fn create(&self, poll: NewPoll) -> Result<Poll>;

    /// Writes title, ending date and vote counts of an existing poll.
    /// Fails with `NotFound` when the poll is not stored.
    async fn update(&self, poll: &Poll) -> Result<()>;

    /// Reads, mutates and writes one poll without letting another `modify`
    /// on the same poll interleave. Nothing is written unless the mutation
    /// returns `true`. Returns the stored poll, or `None` if there is no such
    /// poll.
    async fn modify<'a>(&'a self, id: i64, mutation: PollMutation<'a>) -> Result<Option<Poll>>;
}

#[derive(Debug, Default)]
struct MemoryState {
    polls: HashMap<i64, Poll>,
    last_poll_id: i64,
    last_option_id: i64,
}

/// Process-local store, mostly for tests and single-node setups.
#[derive(Debug, Default)]
pub struct MemoryPollStore {
    state: Mutex<MemoryState>,
}

impl MemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts an already built poll in place, keeping its ids.
    pub async fn insert(&self, poll: Poll) {
        let mut state = self.state.lock().await;
        state.last_poll_id = state.last_poll_id.max(poll.id);
        let max_option = poll.options.iter().map(|o| o.id).max().unwrap_or(0);
        state.last_option_id = state.last_option_id.max(max_option);
        state.polls.insert(poll.id, poll);
    }
}

#[async_trait]
impl PollStore for MemoryPollStore {
    async fn get(&self, id: i64) -> Result<Option<Poll>> {
        Ok(self.state.lock().await.polls.get(&id).cloned())
    }

    async fn create(&self, poll: NewPoll) -> Result<Poll> {
        let mut state = self.state.lock().await;
        state.last_poll_id += 1;
        let poll_id = state.last_poll_id;

        let mut options = Vec::with_capacity(poll.options.len());
        for name in poll.options {
            state.last_option_id += 1;
            options.push(PollOption {
                id: state.last_option_id,
                poll_id,
                name,
                votes_count: 0,
            });
        }

        let created = Poll {
            id: poll_id,
            title: poll.title,
            ending_date: poll.ending_date,
            options,
        };
        state.polls.insert(poll_id, created.clone());
        Ok(created)
    }

    async fn update(&self, poll: &Poll) -> Result<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .polls
            .get_mut(&poll.id)
            .ok_or_else(|| ForumError::poll_not_found(poll.id))?;
        *stored = poll.clone();
        Ok(())
    }

    async fn modify<'a>(&'a self, id: i64, mutation: PollMutation<'a>) -> Result<Option<Poll>> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.polls.get_mut(&id) else {
            return Ok(None);
        };

        let mut poll = stored.clone();
        if mutation(&mut poll) {
            *stored = poll;
        }
        Ok(Some(stored.clone()))
    }
}
