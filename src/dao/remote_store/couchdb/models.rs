use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dao::models::PresetEntity;

/// Document holding the entire saved preset collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchTeamsDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub record_type: String,
    pub teams_data: Vec<PresetEntity>,
}

#[derive(Debug, Deserialize)]
pub struct ChangesResponse {
    #[serde(default)]
    pub results: Vec<ChangeRow>,
    pub last_seq: Value,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRow {
    pub id: String,
}

/// CouchDB 1.x reports numeric sequences, later releases opaque strings.
pub fn seq_to_string(seq: &Value) -> String {
    match seq {
        Value::String(seq) => seq.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_and_opaque_sequences_are_both_accepted() {
        assert_eq!(seq_to_string(&json!(42)), "42");
        assert_eq!(seq_to_string(&json!("17-g1AAAA")), "17-g1AAAA");
    }

    #[test]
    fn new_document_omits_revision() {
        let doc = CouchTeamsDocument {
            id: "userTeams".into(),
            rev: None,
            record_type: "Teams".into(),
            teams_data: Vec::new(),
        };

        let value = serde_json::to_value(&doc).expect("serializable");

        assert_eq!(value["_id"], "userTeams");
        assert!(value.get("_rev").is_none());
        assert_eq!(value["teams_data"], json!([]));
    }
}
