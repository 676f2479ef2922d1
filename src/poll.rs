// src/poll.rs
use std::collections::HashSet;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{ForumError, Result};
use crate::models::{NewPoll, Poll};
use crate::store::PollStore;

/// Creates polls and records votes in them.
///
/// Permission checks belong to the caller; this service only knows whether
/// a poll is still open.
pub struct PollService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: PollStore> PollService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: PollStore, C: Clock> PollService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get(&self, poll_id: i64) -> Result<Poll> {
        self.store
            .get(poll_id)
            .await?
            .ok_or_else(|| ForumError::poll_not_found(poll_id))
    }

    pub async fn create_poll(&self, poll: NewPoll) -> Result<Poll> {
        poll.validate()?;
        let created = self.store.create(poll).await?;
        info!(poll_id = created.id, options = created.options.len(), "created poll");
        Ok(created)
    }

    /// Adds one vote to each chosen option of an open poll.
    ///
    /// Voting in a closed poll, or for option ids the poll does not have,
    /// changes nothing and is not an error.
    pub async fn vote(&self, poll_id: i64, chosen_option_ids: &HashSet<i64>) -> Result<Poll> {
        let now = self.clock.now();
        let mut applied = 0;

        let poll = self
            .store
            .modify(
                poll_id,
                Box::new(|poll: &mut Poll| {
                    applied = poll.apply_votes(chosen_option_ids, now);
                    applied > 0
                }),
            )
            .await?
            .ok_or_else(|| ForumError::poll_not_found(poll_id))?;

        if poll.is_active(now) {
            debug!(poll_id, requested = chosen_option_ids.len(), applied, "vote recorded");
        } else {
            info!(poll_id, "ignored vote in closed poll");
        }
        Ok(poll)
    }
}
