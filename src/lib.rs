// src/lib.rs
//! Forum pagination and poll voting.
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod poll;
pub mod store;
pub mod telemetry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ForumConfig;
pub use db::{create_pool, PgPollStore};
pub use error::{ForumError, Result};
pub use models::{NewPoll, PluginConfiguration, PluginProperty, Poll, PollOption, PropertyKind};
pub use pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, FIRST_PAGE_NUMBER};
pub use poll::PollService;
pub use store::{MemoryPollStore, PollMutation, PollStore};
