//! Assessment records as supplied by the session repository.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One assessment session: an arbitrary JSON document.
///
/// No schema is imposed beyond two well-known top-level keys, `session_id`
/// and `assessment_id`. Everything else is reached through path expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentRecord(Value);

impl AssessmentRecord {
    pub const SESSION_ID_KEY: &'static str = "session_id";
    pub const ASSESSMENT_ID_KEY: &'static str = "assessment_id";
    pub const TIMESTAMP_KEY: &'static str = "timestamp";

    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// The raw document, for path traversal.
    pub fn document(&self) -> &Value {
        &self.0
    }

    pub fn into_document(self) -> Value {
        self.0
    }

    pub fn session_id(&self) -> Option<&str> {
        self.0.get(Self::SESSION_ID_KEY).and_then(Value::as_str)
    }

    /// The key used to look up this record's report configuration.
    pub fn assessment_id(&self) -> Option<&str> {
        self.0.get(Self::ASSESSMENT_ID_KEY).and_then(Value::as_str)
    }

    pub fn timestamp(&self) -> Option<&Value> {
        self.0.get(Self::TIMESTAMP_KEY).filter(|v| !v.is_null())
    }

    /// Top-level keys of the document, in document order.
    pub fn keys(&self) -> Vec<String> {
        match &self.0 {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Value> for AssessmentRecord {
    fn from(document: Value) -> Self {
        Self(document)
    }
}
