//! Type-to-widget mapping.
//!
//! Pure, total functions from a declared field type to the widget that
//! edits or presents it. Every tag maps to something; unknown types
//! fall back to plain text widgets, so there is no failure path here.

use chrono::Local;
use rb_protocol::{InputWidget, OutputWidget, TypeTag, ValueProp, WidgetSpec};

/// Input widget for one declared field.
pub fn input_widget_for(name: &str, tag: TypeTag) -> WidgetSpec<InputWidget> {
    let (widget, value_prop) = match tag {
        TypeTag::Integer => (
            InputWidget::NumberBox {
                step: 1.0,
                placeholder: format!("Enter {name} (number)..."),
            },
            ValueProp::Value,
        ),
        TypeTag::Float => (
            InputWidget::NumberBox {
                step: 0.1,
                placeholder: format!("Enter {name} (decimal)..."),
            },
            ValueProp::Value,
        ),
        TypeTag::Boolean => (
            InputWidget::Checkbox {
                label: name.to_string(),
            },
            ValueProp::Value,
        ),
        TypeTag::Date => (
            InputWidget::DatePicker {
                default: Local::now().date_naive(),
            },
            ValueProp::Date,
        ),
        TypeTag::StringList => (
            InputWidget::JsonTextArea {
                rows: 3,
                placeholder: format!("Enter {name} as JSON list..."),
            },
            ValueProp::Value,
        ),
        TypeTag::ObjectMap | TypeTag::StructuredRecord => (
            InputWidget::JsonTextArea {
                rows: 4,
                placeholder: format!("Enter {name} as JSON object..."),
            },
            ValueProp::Value,
        ),
        // Default to a text box for everything else, including the
        // output-only tags and Unknown.
        TypeTag::String
        | TypeTag::Url
        | TypeTag::OpaqueTabular
        | TypeTag::OpaqueFigure
        | TypeTag::Unknown => (
            InputWidget::TextBox {
                placeholder: format!("Enter {name}..."),
            },
            ValueProp::Value,
        ),
    };

    WidgetSpec {
        id: format!("input-{name}"),
        widget,
        value_prop,
    }
}

/// Output widget for one declared field.
pub fn output_widget_for(name: &str, tag: TypeTag) -> WidgetSpec<OutputWidget> {
    let (widget, value_prop) = match tag {
        TypeTag::Integer | TypeTag::Float | TypeTag::Boolean => {
            (OutputWidget::TextBox, ValueProp::Value)
        }
        TypeTag::Url => (OutputWidget::Image, ValueProp::Src),
        TypeTag::OpaqueTabular => (OutputWidget::DataGrid { page_size: 10 }, ValueProp::Data),
        TypeTag::OpaqueFigure => (OutputWidget::Chart, ValueProp::Figure),
        // Default to a read-only text area for everything else.
        TypeTag::String
        | TypeTag::Date
        | TypeTag::StringList
        | TypeTag::ObjectMap
        | TypeTag::StructuredRecord
        | TypeTag::Unknown => (
            OutputWidget::TextArea {
                placeholder: "Output will appear here...".to_string(),
            },
            ValueProp::Value,
        ),
    };

    WidgetSpec {
        id: format!("output-{name}"),
        widget,
        value_prop,
    }
}
