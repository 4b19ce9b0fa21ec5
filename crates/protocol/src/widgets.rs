//! Widget specification models.
//!
//! A `WidgetSpec` describes one UI presentation element bound to one
//! typed value. The specs are plain data: the core's mapper produces
//! them from a `TypeTag`, and only the rendering boundary (the shell)
//! knows how to realize them on screen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input widget kinds the mapper can produce.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InputWidget {
    /// Single-line text box.
    TextBox { placeholder: String },

    /// Numeric box with a step increment (1 for integers, fractional
    /// for floats).
    NumberBox { step: f64, placeholder: String },

    /// Checkbox with a label.
    Checkbox { label: String },

    /// Date picker, pre-filled with a default date.
    DatePicker { default: NaiveDate },

    /// Multi-line JSON text box.
    JsonTextArea { rows: u16, placeholder: String },
}

/// Output widget kinds the mapper can produce.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OutputWidget {
    /// Read-only multi-line text area.
    TextArea { placeholder: String },

    /// Read-only single-line text box.
    TextBox,

    /// Image element bound to a URL.
    Image,

    /// Paginated data grid bound to row records.
    DataGrid { page_size: usize },

    /// Chart element bound to an opaque figure payload.
    Chart,
}

/// Which property of the widget carries its value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ValueProp {
    Value,
    Date,
    Src,
    Data,
    Figure,
}

/// A widget bound to one named field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSpec<W> {
    /// Stable element id ("input-{name}" or "output-{name}").
    pub id: String,

    /// The widget to present.
    pub widget: W,

    /// The property the bound value flows through.
    pub value_prop: ValueProp,
}

/// A value formatted for display, ready for its widget's bound
/// property.
///
/// `Rows` and `Figure` are the opaque pass-through shapes; only the
/// rendering boundary inspects them further.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum DisplayValue {
    /// Plain text for text boxes and text areas.
    Text(String),

    /// Ordered row records for the data grid.
    Rows(Vec<serde_json::Map<String, Value>>),

    /// Opaque figure payload for the chart element, unformatted.
    Figure(Value),

    /// URL string for the image element.
    Image(String),
}

impl DisplayValue {
    /// Text form for widgets that can only show a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DisplayValue::Text(text) => Some(text),
            DisplayValue::Image(url) => Some(url),
            _ => None,
        }
    }
}
