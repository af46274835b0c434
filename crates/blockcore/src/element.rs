use crate::value::{Config, ConfigExt};
use crate::DocumentError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque element identifier, the join key into run results
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Fresh UUID v4 identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of element; decides both its form fields and what running it does.
///
/// Type strings that are not recognized are carried as `Other` so imported
/// documents survive a round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    PdfUpload,
    TextInput,
    NumberInput,
    DateInput,
    Checkbox,
    Slider,
    Selectbox,
    Conditional,
    Loop,
    DataDisplay,
    Chart,
    SaveData,
    ApiCall,
    Email,
    Timer,
    Other(String),
}

impl ElementKind {
    /// Every recognized kind, in palette order
    pub const ALL: [ElementKind; 15] = [
        ElementKind::PdfUpload,
        ElementKind::TextInput,
        ElementKind::NumberInput,
        ElementKind::DateInput,
        ElementKind::Checkbox,
        ElementKind::Slider,
        ElementKind::Selectbox,
        ElementKind::Conditional,
        ElementKind::Loop,
        ElementKind::DataDisplay,
        ElementKind::Chart,
        ElementKind::SaveData,
        ElementKind::ApiCall,
        ElementKind::Email,
        ElementKind::Timer,
    ];

    /// Wire name (`"pdf_upload"`, `"api_call"`, ...)
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::PdfUpload => "pdf_upload",
            ElementKind::TextInput => "text_input",
            ElementKind::NumberInput => "number_input",
            ElementKind::DateInput => "date_input",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Slider => "slider",
            ElementKind::Selectbox => "selectbox",
            ElementKind::Conditional => "conditional",
            ElementKind::Loop => "loop",
            ElementKind::DataDisplay => "data_display",
            ElementKind::Chart => "chart",
            ElementKind::SaveData => "save_data",
            ElementKind::ApiCall => "api_call",
            ElementKind::Email => "email",
            ElementKind::Timer => "timer",
            ElementKind::Other(name) => name,
        }
    }

    /// Lenient lookup: unknown names become [`ElementKind::Other`]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .find(|kind| kind.as_str() == name)
            .cloned()
            .unwrap_or_else(|| ElementKind::Other(name.to_string()))
    }

    pub fn display_name(&self) -> Cow<'static, str> {
        let name = match self {
            ElementKind::PdfUpload => "PDF Upload",
            ElementKind::TextInput => "Text Input",
            ElementKind::NumberInput => "Number Input",
            ElementKind::DateInput => "Date Input",
            ElementKind::Checkbox => "Checkbox",
            ElementKind::Slider => "Slider",
            ElementKind::Selectbox => "Select Box",
            ElementKind::Conditional => "Conditional Logic",
            ElementKind::Loop => "Loop",
            ElementKind::DataDisplay => "Data Display",
            ElementKind::Chart => "Chart",
            ElementKind::SaveData => "Save Data",
            ElementKind::ApiCall => "API Call",
            ElementKind::Email => "Email",
            ElementKind::Timer => "Timer",
            ElementKind::Other(name) => return Cow::Owned(title_case(name)),
        };
        Cow::Borrowed(name)
    }

    /// Readiness rule applied when the user edits an element's config.
    ///
    /// `None` means the kind has no rule and its status is left alone.
    pub fn readiness(&self, config: &Config) -> Option<ElementStatus> {
        let ready = match self {
            ElementKind::PdfUpload => config.is_filled("filename") && config.has("size"),
            ElementKind::TextInput => config.is_filled("value"),
            ElementKind::NumberInput
            | ElementKind::DateInput
            | ElementKind::Checkbox
            | ElementKind::Slider
            | ElementKind::Selectbox
            | ElementKind::DataDisplay
            | ElementKind::Chart => true,
            ElementKind::Conditional => config.is_filled("condition_value"),
            ElementKind::ApiCall => config.is_filled("url"),
            ElementKind::Email => config.is_filled("recipient") && config.is_filled("subject"),
            ElementKind::Loop | ElementKind::SaveData | ElementKind::Timer | ElementKind::Other(_) => {
                return None
            }
        };

        Some(if ready {
            ElementStatus::Ready
        } else {
            ElementStatus::Pending
        })
    }
}

fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse used when a user picks a kind to add
impl FromStr for ElementKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_name(s) {
            ElementKind::Other(name) => Err(DocumentError::UnknownElementType(name)),
            kind => Ok(kind),
        }
    }
}

impl Serialize for ElementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ElementKind::from_name(&name))
    }
}

/// Element lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementStatus {
    #[default]
    Pending,
    Ready,
    Processing,
    Error,
}

impl ElementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementStatus::Pending => "pending",
            ElementStatus::Ready => "ready",
            ElementStatus::Processing => "processing",
            ElementStatus::Error => "error",
        }
    }

    /// A run leaves every element in one of these
    pub fn is_terminal(&self) -> bool {
        matches!(self, ElementStatus::Ready | ElementStatus::Error)
    }
}

impl fmt::Display for ElementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element position on the canvas. Cosmetic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One configurable unit of a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    #[serde(rename = "type")]
    kind: ElementKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    config: Config,
    #[serde(default)]
    status: ElementStatus,
    #[serde(default)]
    output: Option<serde_json::Value>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self::with_id(ElementId::generate(), kind)
    }

    pub fn with_id(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            config: Config::new(),
            status: ElementStatus::Pending,
            output: None,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Set a raw config field without re-evaluating readiness
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> ElementStatus {
        self.status
    }

    pub fn output(&self) -> Option<&serde_json::Value> {
        self.output.as_ref()
    }

    /// Merge form values into the config and re-evaluate readiness.
    ///
    /// Kinds without a readiness rule keep their current status.
    pub fn apply_config(&mut self, fields: Config) -> ElementStatus {
        self.config.extend(fields);
        if let Some(status) = self.kind.readiness(&self.config) {
            self.status = status;
        }
        self.status
    }

    /// Enter `processing` at the start of a run step
    pub fn mark_processing(&mut self) {
        self.status = ElementStatus::Processing;
    }

    /// Record the terminal status and result of a run step
    pub fn record_outcome(&mut self, status: ElementStatus, result: serde_json::Value) {
        self.status = status;
        self.output = Some(result);
    }
}
