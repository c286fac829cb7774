//! Level streaming for an endless runner.
//!
//! A [`StreamController`] keeps a bounded FIFO of fixed-length track segments
//! ahead of a player moving along the travel axis. Each tick it extends the
//! frontier when the player comes within the look-ahead distance, and retires
//! the oldest segment once the window holds more than the retention target.
//!
//! # Invariants
//! - The frontier only ever advances, by exactly one segment length per spawn.
//! - Segments are retired strictly in insertion order.
//! - After any tick the window holds at most `segments_to_keep` segments.
//! - `tick` does O(1) work: at most one pick, one spawn and one retirement.

mod catalog;
mod config;
mod controller;
mod cursor;
mod error;
mod factory;
mod level;
mod window;

pub use catalog::SegmentCatalog;
pub use config::{LevelSetup, StreamConfig};
pub use controller::{
    PLAYER_FORWARD_NUDGE, PLAYER_LIFT, StreamController, StreamState, StreamStats, TickReport,
    player_spawn_transform,
};
pub use cursor::Cursor;
pub use error::{ConfigError, LevelFileError, StreamError};
pub use factory::{PlayerAnchor, WorldFactory};
pub use level::{AnchorSpec, LevelFile};
pub use window::{SegmentInstance, SegmentWindow};

pub fn crate_info() -> &'static str {
    concat!("runner-stream v", env!("CARGO_PKG_VERSION"))
}
