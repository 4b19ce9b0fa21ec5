//! Schema introspection.
//!
//! Reads the declarative field lists a workflow supplies and
//! normalizes them into the ordered `FieldSchema` sets the controller
//! builds its widgets from. Runs exactly once at controller
//! construction; the result is immutable for the controller's
//! lifetime.

use crate::engine::Workflow;
use rb_protocol::{FieldSchema, TypeTag};

/// Ordered input fields for the workflow's start record.
///
/// A fully untyped field degrades to `String` so it still gets a
/// usable text widget.
pub fn input_fields(workflow: &dyn Workflow) -> Vec<FieldSchema> {
    workflow
        .start_fields()
        .into_iter()
        .map(degrade_unknown)
        .collect()
}

/// Ordered output fields for the workflow's terminal record.
///
/// A workflow using the generic terminal shape (no declared fields)
/// yields the single synthetic `result: String` field.
pub fn output_fields(workflow: &dyn Workflow) -> Vec<FieldSchema> {
    let fields = workflow.stop_fields();
    if fields.is_empty() {
        return vec![FieldSchema::new("result", TypeTag::String)];
    }
    fields.into_iter().map(degrade_unknown).collect()
}

fn degrade_unknown(field: FieldSchema) -> FieldSchema {
    match field.value_type {
        TypeTag::Unknown => FieldSchema::new(field.name, TypeTag::String),
        _ => field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{InputMap, WorkflowContext, WorkflowError};
    use async_trait::async_trait;
    use rb_protocol::ResultRecord;
    use serde_json::json;

    struct DeclaredWorkflow {
        inputs: Vec<FieldSchema>,
        outputs: Vec<FieldSchema>,
    }

    #[async_trait]
    impl Workflow for DeclaredWorkflow {
        fn start_fields(&self) -> Vec<FieldSchema> {
            self.inputs.clone()
        }

        fn stop_fields(&self) -> Vec<FieldSchema> {
            self.outputs.clone()
        }

        async fn run(
            &self,
            _ctx: WorkflowContext,
            _input: InputMap,
        ) -> Result<ResultRecord, WorkflowError> {
            Ok(ResultRecord::new(json!(null)))
        }
    }

    #[test]
    fn test_input_fields_preserve_order() {
        let workflow = DeclaredWorkflow {
            inputs: vec![
                FieldSchema::new("text", TypeTag::String),
                FieldSchema::new("count", TypeTag::Integer),
                FieldSchema::new("date", TypeTag::Date),
            ],
            outputs: Vec::new(),
        };

        let fields = input_fields(&workflow);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["text", "count", "date"]);
    }

    #[test]
    fn test_untyped_input_degrades_to_string() {
        let workflow = DeclaredWorkflow {
            inputs: vec![FieldSchema::new("anything", TypeTag::Unknown)],
            outputs: Vec::new(),
        };

        let fields = input_fields(&workflow);
        assert_eq!(fields[0].value_type, TypeTag::String);
    }

    #[test]
    fn test_generic_terminal_shape_yields_synthetic_result() {
        let workflow = DeclaredWorkflow {
            inputs: Vec::new(),
            outputs: Vec::new(),
        };

        let fields = output_fields(&workflow);
        assert_eq!(fields, vec![FieldSchema::new("result", TypeTag::String)]);
    }

    #[test]
    fn test_declared_outputs_pass_through() {
        let workflow = DeclaredWorkflow {
            inputs: Vec::new(),
            outputs: vec![
                FieldSchema::new("summary", TypeTag::String),
                FieldSchema::new("chart", TypeTag::OpaqueFigure),
            ],
        };

        let fields = output_fields(&workflow);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].value_type, TypeTag::OpaqueFigure);
    }
}
