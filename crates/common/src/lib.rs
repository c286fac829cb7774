//! Shared value types used by every runner crate.

mod types;

pub use types::{EntityId, TRAVEL_AXIS, TemplateId, Transform};
