use crate::{BlockError, Config, DocumentError, Element, ElementId, ElementKind, ElementStatus};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Version tag written on export
pub const FORMAT_VERSION: &str = "1.0";

/// Horizontal distance between consecutive elements on the canvas
const SLOT_WIDTH: f64 = 100.0;
const ROW_Y: f64 = 50.0;

/// The ordered workflow: the unit of export and import
#[derive(Debug, Clone)]
pub struct WorkflowDocument {
    elements: Vec<Element>,
    /// When the workflow was started, or the stamp of the file it was
    /// imported from. Informational only: exports carry their own time.
    created_at: DateTime<Utc>,
    version: String,
}

/// Wire shape of an exported document
#[derive(Serialize)]
struct SerializedDocument<'a> {
    elements: &'a [Element],
    created_at: DateTime<Utc>,
    version: &'a str,
}

impl WorkflowDocument {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            created_at: Utc::now(),
            version: FORMAT_VERSION.to_string(),
        }
    }

    /// Append a new pending element in the next free horizontal slot
    pub fn add_element(&mut self, kind: ElementKind) -> &Element {
        let x = self.elements.len() as f64 * SLOT_WIDTH;
        tracing::debug!("Adding {} element at x={}", kind, x);
        self.elements.push(Element::new(kind).with_position(x, ROW_Y));
        &self.elements[self.elements.len() - 1]
    }

    /// Remove the element at `index`. Remaining ids are untouched.
    pub fn remove_element(&mut self, index: usize) -> Result<Element, DocumentError> {
        if index >= self.elements.len() {
            return Err(DocumentError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            });
        }
        Ok(self.elements.remove(index))
    }

    /// Merge form values into the element at `index` and recompute its status
    pub fn update_config(&mut self, index: usize, fields: Config) -> Result<ElementStatus, DocumentError> {
        let len = self.elements.len();
        let element = self
            .elements
            .get_mut(index)
            .ok_or(DocumentError::IndexOutOfRange { index, len })?;
        Ok(element.apply_config(fields))
    }

    pub fn update_config_by_id(&mut self, id: &ElementId, fields: Config) -> Result<ElementStatus, DocumentError> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| DocumentError::ElementNotFound(id.to_string()))?;
        Ok(element.apply_config(fields))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn get_by_id(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Mutable access for the executor; the sequence itself cannot be resized
    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Creation time shown to the user; [`serialize`](Self::serialize)
    /// stamps the export time instead of this value
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn stats(&self) -> DocumentStats {
        let total = self.elements.len();
        let ready = self.count_status(ElementStatus::Ready);
        let errors = self.count_status(ElementStatus::Error);
        DocumentStats {
            total,
            ready,
            pending: total - ready - errors,
            errors,
        }
    }

    fn count_status(&self, status: ElementStatus) -> usize {
        self.elements.iter().filter(|e| e.status() == status).count()
    }

    /// Export structure, stamped with the current time and version `1.0`
    pub fn serialize(&self) -> Result<Value, BlockError> {
        let doc = SerializedDocument {
            elements: &self.elements,
            created_at: Utc::now(),
            version: FORMAT_VERSION,
        };
        Ok(serde_json::to_value(doc)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, BlockError> {
        Ok(serde_json::to_string_pretty(&self.serialize()?)?)
    }

    /// Replace this document's contents with an imported one.
    ///
    /// The whole input is validated first; on error nothing is replaced.
    pub fn deserialize(&mut self, value: &Value) -> Result<(), DocumentError> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, BlockError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value)?)
    }

    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let root = value
            .as_object()
            .ok_or_else(|| malformed("document must be a JSON object"))?;

        let raw_elements: &[Value] = match root.get("elements") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(_) => return Err(malformed("`elements` must be an array")),
        };

        let mut seen = HashSet::new();
        let mut elements = Vec::with_capacity(raw_elements.len());
        for (index, raw) in raw_elements.iter().enumerate() {
            let element = parse_element(index, raw)?;
            if !seen.insert(element.id().clone()) {
                return Err(malformed(format!("element {}: duplicate id '{}'", index, element.id())));
            }
            elements.push(element);
        }

        let created_at = root
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        let version = root
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or(FORMAT_VERSION)
            .to_string();
        if version != FORMAT_VERSION {
            tracing::warn!("Importing document with version {} (expected {})", version, FORMAT_VERSION);
        }

        Ok(Self {
            elements,
            created_at,
            version,
        })
    }
}

impl Default for WorkflowDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn malformed(message: impl Into<String>) -> DocumentError {
    DocumentError::MalformedDocument(message.into())
}

fn parse_element(index: usize, raw: &Value) -> Result<Element, DocumentError> {
    let fields = raw
        .as_object()
        .ok_or_else(|| malformed(format!("element {} is not an object", index)))?;

    for required in ["id", "type"] {
        match fields.get(required) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(malformed(format!("element {}: `{}` must be a string", index, required)));
            }
            None => {
                return Err(malformed(format!("element {}: missing required field `{}`", index, required)));
            }
        }
    }

    // `null` sub-fields fall back to their defaults like missing ones
    let mut fields = fields.clone();
    fields.retain(|key, value| key == "output" || !value.is_null());
    serde_json::from_value(Value::Object(fields)).map_err(|e| malformed(format!("element {}: {}", index, e)))
}

/// RFC 3339, or the naive ISO-8601 form older exports carry
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Status counts shown in the workflow summary.
/// `pending` covers everything that is neither ready nor in error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub total: usize,
    pub ready: usize,
    pub pending: usize,
    pub errors: usize,
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elements: {} ready, {} pending, {} errors",
            self.total, self.ready, self.pending, self.errors
        )
    }
}

/// Download file name for an export made at `now`
pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format("workflow_%Y%m%d_%H%M%S.json").to_string()
}
