//! # rb-protocol
//!
//! Core protocol definitions and data models for runboard.
//!
//! This crate defines all shared data structures used for:
//! - Declared field schemas (name/type pairs)
//! - Run events and final result records
//! - Widget specifications and display values
//! - Channel communication between the shell and the run controller
//!
//! ## Modules
//!
//! - [`fields`]: Type tags and field schemas
//! - [`events`]: Run events, result records, event cards, chat blocks
//! - [`widgets`]: Widget specifications and display values
//! - [`ipc`]: Operations and Updates for shell-controller communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, serde_json, uuid, and chrono
//! - Independent compilation: no dependencies on other runboard crates

pub mod events;
pub mod fields;
pub mod ipc;
pub mod widgets;

// Re-export all public types for convenience
pub use events::*;
pub use fields::*;
pub use ipc::*;
pub use widgets::*;
