//! Rendering functions for the dashboard panes.
//!
//! Each module renders one pane from display state owned by the app;
//! none of them hold state of their own.

pub mod chat;
pub mod event_log;
pub mod form;
pub mod modal;
pub mod outputs;
