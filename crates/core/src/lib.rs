//! Core logic for runboard: workflow introspection, value coercion,
//! widget mapping, and the sequential run controller.
//!
//! The shell crates depend on this one and speak to it exclusively
//! through the [`rb_protocol`] message types. Nothing in here draws
//! anything; the controller emits [`rb_protocol::Update`]s and the
//! shell renders them.

pub mod coerce;
pub mod controller;
pub mod engine;
pub mod introspect;
pub mod widgets;

pub use controller::{Phase, RunController};
pub use engine::{
    ExecutionContext, ExecutionHandle, InputMap, Workflow, WorkflowContext, WorkflowError,
};
