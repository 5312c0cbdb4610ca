//! Change feed for the complaint desk.
//!
//! - [`ChangeFeed`] -- in-process fan-out of row mutations, backed by
//!   `tokio::sync::broadcast`, with scoped [`Subscription`]s that stop
//!   delivering as soon as they are dropped.
//! - [`ChangeEvent`] -- one row mutation (`table`, `op`, `id`).
//! - [`ChangeListener`] -- background service bridging PostgreSQL
//!   `LISTEN/NOTIFY` on [`CHANGE_CHANNEL`] into the feed.

pub mod bus;
pub mod listener;

pub use bus::{ChangeEvent, ChangeFeed, ChangeKind, EventMask, Subscription};
pub use listener::{parse_payload, ChangeListener, CHANGE_CHANNEL};
