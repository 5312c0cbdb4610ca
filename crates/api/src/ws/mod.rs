//! Live admin view over WebSocket.
//!
//! Provides connection management, heartbeat monitoring, and the upgrade
//! handler that pushes the complaint view on every change.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{admin_ws_handler, AdminFeedMessage, WATCHED_TABLE};
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
