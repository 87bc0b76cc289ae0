//! # Game Module
//!
//! The playback-session orchestrator behind the blind listening game. A round
//! picks a random track from a pool, plays it on a Spotify device from a random
//! position and pauses it again after a few seconds.
//!
//! ## Components
//!
//! - [`pool`] - fetches every track of a pool, following pagination
//! - [`shuffle`] - Fisher–Yates permutation of a slice
//! - [`device`] - lists devices and picks the target through a [`DeviceSelector`]
//! - [`controller`] - play, enqueue and pause commands within Spotify's batch limits
//! - [`session`] - the round state machine and its single stop timer
//!
//! Data flows one way: fetcher → shuffle → controller, with the device resolver
//! feeding the controller and the session coordinating timing.
//!
//! ## Errors
//!
//! Listing calls (tracks, devices) fail the operation with [`RoundError`]. Player
//! commands never do: their errors are logged and handed back inside [`Round`] and
//! [`QueueReport`], so a round can complete in a degraded state.

use thiserror::Error;

use crate::{spotify::ApiError, types::PoolRef};

pub mod controller;
pub mod device;
pub mod pool;
pub mod session;
pub mod shuffle;

pub use controller::{EnqueueOutcome, QueueReport};
pub use device::DeviceSelector;
pub use session::{Round, Session, SessionState, random_offset};
pub use shuffle::{shuffle, shuffle_with};

/// Items requested per page when listing a pool.
pub const PAGE_LIMIT: u32 = 50;

/// URIs Spotify accepts in a single play call.
pub const PLAY_BATCH_LIMIT: usize = 50;

/// Tracks acted upon by one bulk queue, initial batch included.
pub const QUEUE_LIMIT: usize = 400;

#[derive(Debug, Error)]
pub enum RoundError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0} has no playable tracks")]
    EmptyPool(PoolRef),

    #[error("no playback device available, open Spotify on a device first")]
    NoDevice,

    #[error("no pool configured")]
    NoPool,
}
