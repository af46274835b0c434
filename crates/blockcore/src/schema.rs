use crate::{Config, ElementKind};
use serde::Serialize;
use serde_json::{json, Value};

/// A form field the UI renders for an element kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub label: &'static str,
    /// Readiness depends on this field being filled
    pub required: bool,
    /// Value a freshly rendered form submits
    pub default: Option<Value>,
    /// Allowed choices, empty for free-form fields
    pub options: Vec<&'static str>,
}

impl FieldDefinition {
    pub fn required(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: true,
            default: None,
            options: Vec::new(),
        }
    }

    pub fn optional(name: &'static str, label: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, label)
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict to a fixed set of choices; the first one becomes the default
    pub fn with_options(mut self, options: &[&'static str]) -> Self {
        self.options = options.to_vec();
        if self.default.is_none() {
            self.default = options.first().map(|o| Value::from(*o));
        }
        self
    }
}

impl ElementKind {
    /// Form fields offered for this kind. Empty when no config UI exists yet.
    pub fn fields(&self) -> Vec<FieldDefinition> {
        match self {
            ElementKind::PdfUpload => vec![
                FieldDefinition::required("filename", "PDF file name"),
                FieldDefinition::required("size", "PDF size in bytes"),
            ],
            ElementKind::TextInput => vec![
                FieldDefinition::optional("label", "Label").with_default("Enter text"),
                FieldDefinition::required("value", "Input Text"),
            ],
            ElementKind::NumberInput => vec![
                FieldDefinition::optional("label", "Label").with_default("Enter number"),
                FieldDefinition::optional("value", "Number").with_default(0.0),
            ],
            ElementKind::DateInput => vec![
                FieldDefinition::optional("label", "Label").with_default("Select date"),
                FieldDefinition::optional("value", "Date")
                    .with_default(chrono::Local::now().date_naive().to_string()),
            ],
            ElementKind::Checkbox => vec![
                FieldDefinition::optional("label", "Label").with_default("Check option"),
                FieldDefinition::optional("value", "Checked").with_default(false),
            ],
            ElementKind::Slider => vec![
                FieldDefinition::optional("label", "Label").with_default("Select value"),
                FieldDefinition::optional("min", "Min Value").with_default(0),
                FieldDefinition::optional("max", "Max Value").with_default(100),
                FieldDefinition::optional("value", "Value").with_default(0),
            ],
            ElementKind::Selectbox => vec![
                FieldDefinition::optional("label", "Label").with_default("Choose option"),
                FieldDefinition::optional("options", "Options (one per line)")
                    .with_default(json!(["Option 1", "Option 2", "Option 3"])),
                FieldDefinition::optional("value", "Selected option").with_default("Option 1"),
            ],
            ElementKind::Conditional => vec![
                FieldDefinition::optional("condition_type", "Condition Type")
                    .with_options(&["equals", "greater_than", "less_than", "contains"]),
                FieldDefinition::required("condition_value", "Condition Value"),
                FieldDefinition::optional("true_action", "Action if True").with_default(""),
                FieldDefinition::optional("false_action", "Action if False").with_default(""),
            ],
            ElementKind::DataDisplay => vec![FieldDefinition::optional("display_type", "Display Type")
                .with_options(&["table", "json", "text"])],
            ElementKind::Chart => vec![FieldDefinition::optional("chart_type", "Chart Type")
                .with_options(&["line", "bar", "scatter", "area"])],
            ElementKind::ApiCall => vec![
                FieldDefinition::required("url", "API URL"),
                FieldDefinition::optional("method", "Method").with_options(&["GET", "POST", "PUT", "DELETE"]),
                FieldDefinition::optional("headers", "Headers (JSON format)").with_default("{}"),
            ],
            ElementKind::Email => vec![
                FieldDefinition::required("recipient", "Recipient Email"),
                FieldDefinition::required("subject", "Subject"),
                FieldDefinition::optional("body", "Email Body").with_default(""),
            ],
            ElementKind::Loop | ElementKind::SaveData | ElementKind::Timer | ElementKind::Other(_) => Vec::new(),
        }
    }

    /// Config a freshly rendered form would submit before the user types anything
    pub fn default_config(&self) -> Config {
        self.fields()
            .into_iter()
            .filter_map(|field| field.default.map(|value| (field.name.to_string(), value)))
            .collect()
    }
}

/// Split newline-separated option text into trimmed, non-blank options
pub fn parse_options(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
