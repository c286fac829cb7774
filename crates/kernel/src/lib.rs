//! World Kernel: authoritative entity state for a runner session.
//!
//! # Invariants
//! - All state mutations flow through explicit operations.
//! - Every mutation appends a [`WorldEvent`].

pub mod world;

pub use world::{EntityData, World, WorldEvent};
