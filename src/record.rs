//! Rule Record Mapping
//!
//! Bidirectional conversion between the persisted item shape (a policy type
//! tag plus up to six positional string fields) and the engine's flat rule
//! line text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Maximum number of positional fields a record can carry.
pub const MAX_FIELDS: usize = 6;

/// One persisted policy rule.
///
/// `id` is the table's primary key and carries no semantic meaning; a reloaded
/// record is matched back to the engine only by `policy_type` + field values.
/// An empty field means "absent" — an empty-string rule argument is
/// indistinguishable from an omitted one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyRecord {
    pub id: String,
    pub policy_type: String,
    #[serde(default)]
    pub field_0: String,
    #[serde(default)]
    pub field_1: String,
    #[serde(default)]
    pub field_2: String,
    #[serde(default)]
    pub field_3: String,
    #[serde(default)]
    pub field_4: String,
    #[serde(default)]
    pub field_5: String,
}

impl PolicyRecord {
    /// Build a record from a policy type tag and positional rule values,
    /// assigning a fresh unique id.
    ///
    /// Anything past the sixth value is dropped silently; arity is the
    /// caller's responsibility.
    pub fn from_rule(ptype: &str, rule: &[String]) -> Self {
        let mut record = Self {
            id: Uuid::new_v4().to_string(),
            policy_type: ptype.to_string(),
            field_0: String::new(),
            field_1: String::new(),
            field_2: String::new(),
            field_3: String::new(),
            field_4: String::new(),
            field_5: String::new(),
        };

        for (slot, value) in record.fields_mut().into_iter().zip(rule.iter()) {
            *slot = value.clone();
        }

        record
    }

    /// Render the record as the engine's flat rule line, skipping empty
    /// fields: `policy_type[, field_0[, field_1[...]]]`.
    pub fn to_line(&self) -> String {
        let mut line = self.policy_type.clone();
        for field in self.fields() {
            if !field.is_empty() {
                line.push_str(", ");
                line.push_str(field);
            }
        }
        line
    }

    /// Serialize into the store's item representation.
    pub fn to_item(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct of string fields always serializes to an object.
            _ => Map::new(),
        }
    }

    /// Deserialize from the store's item representation.
    pub fn from_item(item: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(item))
    }

    fn fields(&self) -> [&str; MAX_FIELDS] {
        [
            &self.field_0,
            &self.field_1,
            &self.field_2,
            &self.field_3,
            &self.field_4,
            &self.field_5,
        ]
    }

    fn fields_mut(&mut self) -> [&mut String; MAX_FIELDS] {
        [
            &mut self.field_0,
            &mut self.field_1,
            &mut self.field_2,
            &mut self.field_3,
            &mut self.field_4,
            &mut self.field_5,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    fn rule(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_rule_assigns_unique_ids() {
        let a = PolicyRecord::from_rule("p", &rule(&["alice", "data1", "read"]));
        let b = PolicyRecord::from_rule("p", &rule(&["alice", "data1", "read"]));
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_to_line_skips_empty_fields() {
        let record = PolicyRecord::from_rule("g", &rule(&["alice", "data2_admin"]));
        assert_eq!(record.to_line(), "g, alice, data2_admin");
    }

    #[test]
    fn test_line_matches_engine_parser() {
        // Feeding the rendered line back through the model must reproduce
        // the same ptype + fields that built the record.
        let values = rule(&["alice", "data1", "read"]);
        let record = PolicyRecord::from_rule("p", &values);

        let mut m = Model::new();
        m.add_policy_line(&record.to_line());
        assert_eq!(m.get_policy("p", "p"), &[values]);
    }

    #[test]
    fn test_truncates_past_six_fields() {
        let values = rule(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let record = PolicyRecord::from_rule("p", &values);
        assert_eq!(record.field_5, "f");
        assert_eq!(record.to_line(), "p, a, b, c, d, e, f");
    }

    #[test]
    fn test_gap_shifts_fields_on_readback() {
        // An empty field followed by a non-empty one collapses positionally;
        // the mapping is strictly positional and does not preserve gaps.
        let record = PolicyRecord::from_rule("p", &rule(&["alice", "", "read"]));
        assert_eq!(record.to_line(), "p, alice, read");
    }

    #[test]
    fn test_item_round_trip() {
        let record = PolicyRecord::from_rule("p2", &rule(&["bob", "data2", "write"]));
        let item = record.to_item();
        assert_eq!(item.get("policy_type"), Some(&serde_json::json!("p2")));
        assert_eq!(item.get("field_0"), Some(&serde_json::json!("bob")));

        let back = PolicyRecord::from_item(item).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_from_item_missing_fields_default_empty() {
        let mut item = Map::new();
        item.insert("id".into(), serde_json::json!("some-id"));
        item.insert("policy_type".into(), serde_json::json!("g"));
        item.insert("field_0".into(), serde_json::json!("alice"));

        let record = PolicyRecord::from_item(item).unwrap();
        assert_eq!(record.to_line(), "g, alice");
    }
}
