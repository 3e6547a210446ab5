use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RecordId = u64;

/// A server-owned record. Only `id` is interpreted; every other member is
/// carried through untouched. Some endpoints spell the identity key `ID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "ID")]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// First string-valued field among `candidates`, used for one-line listings.
    pub fn display_name(&self, candidates: &[&str]) -> Option<&str> {
        candidates
            .iter()
            .find_map(|name| self.fields.get(*name).and_then(|v| v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    #[serde(default)]
    pub is_read: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Notification {
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").and_then(|v| v.as_str())
    }
}
