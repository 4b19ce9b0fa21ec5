//! Bundled demo workflows.
//!
//! Small self-contained workflows covering the interaction patterns
//! the dashboard supports: a human-in-the-loop pause, a stream of
//! intermediate events, and a typed analysis with tabular and figure
//! outputs.

use async_trait::async_trait;
use rb_core::{InputMap, Workflow, WorkflowContext, WorkflowError};
use rb_protocol::{FieldSchema, ResultRecord, TypeTag};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAMES: &[&str] = &["squared", "streaming", "analysis"];

pub fn by_name(name: &str) -> Option<Arc<dyn Workflow>> {
    match name {
        "squared" => Some(Arc::new(SquaredWorkflow)),
        "streaming" => Some(Arc::new(StreamingWorkflow)),
        "analysis" => Some(Arc::new(AnalysisWorkflow)),
        _ => None,
    }
}

/// Pauses immediately, then squares the number the user provides.
pub struct SquaredWorkflow;

#[async_trait]
impl Workflow for SquaredWorkflow {
    fn start_fields(&self) -> Vec<FieldSchema> {
        Vec::new()
    }

    fn stop_fields(&self) -> Vec<FieldSchema> {
        vec![FieldSchema::new("number", TypeTag::Integer)]
    }

    async fn run(
        &self,
        ctx: WorkflowContext,
        _input: InputMap,
    ) -> Result<ResultRecord, WorkflowError> {
        let response = ctx.require_input("Enter a number: ").await?;
        let n: i64 = response.trim().parse().unwrap_or(0);
        Ok(ResultRecord::new(json!({"number": n * n})))
    }
}

/// Streams a couple of info events and an error before finishing.
pub struct StreamingWorkflow;

#[async_trait]
impl Workflow for StreamingWorkflow {
    fn start_fields(&self) -> Vec<FieldSchema> {
        vec![FieldSchema::new("query", TypeTag::String)]
    }

    async fn run(
        &self,
        ctx: WorkflowContext,
        _input: InputMap,
    ) -> Result<ResultRecord, WorkflowError> {
        for msg in ["Hello, world", "I am an info message"] {
            ctx.info(msg).await;
        }
        ctx.error("There was an error").await;
        Ok(ResultRecord::new(json!("Finish")))
    }
}

/// Exercises the typed widgets: date, list and map inputs, tabular
/// and figure outputs.
pub struct AnalysisWorkflow;

#[async_trait]
impl Workflow for AnalysisWorkflow {
    fn start_fields(&self) -> Vec<FieldSchema> {
        vec![
            FieldSchema::new("name", TypeTag::String),
            FieldSchema::new("samples", TypeTag::Integer),
            FieldSchema::new("start_date", TypeTag::Date),
            FieldSchema::new("categories", TypeTag::StringList),
            FieldSchema::new("options", TypeTag::ObjectMap),
        ]
    }

    fn stop_fields(&self) -> Vec<FieldSchema> {
        vec![
            FieldSchema::new("summary", TypeTag::String),
            FieldSchema::new("table", TypeTag::OpaqueTabular),
            FieldSchema::new("chart", TypeTag::OpaqueFigure),
        ]
    }

    async fn run(
        &self,
        ctx: WorkflowContext,
        input: InputMap,
    ) -> Result<ResultRecord, WorkflowError> {
        let name = input
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("analysis");
        let samples = input.get("samples").and_then(Value::as_i64).unwrap_or(10);
        let categories: Vec<String> = input
            .get("categories")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|| vec!["A".to_string(), "B".to_string(), "C".to_string()]);

        ctx.info(format!("analyzing '{name}' over {samples} samples"))
            .await;

        let rows: Vec<Value> = categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let value = (i as i64 + 1) * samples;
                json!({"Category": category, "Value": value})
            })
            .collect();
        ctx.custom("progress", json!({"rows": rows.len()})).await;

        let xs: Vec<i64> = (0..categories.len() as i64).collect();
        let ys: Vec<i64> = rows
            .iter()
            .map(|row| row["Value"].as_i64().unwrap_or(0))
            .collect();
        let figure = json!({
            "data": [{"x": xs, "y": ys, "type": "bar"}],
            "layout": {"title": name},
        });

        Ok(ResultRecord::new(json!({
            "summary": format!("{name}: {} categories, {samples} samples each", categories.len()),
            "table": rows,
            "chart": figure,
        })))
    }
}
