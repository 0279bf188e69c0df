use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cross-reference to another upstream record.
///
/// Upstream sends references either as a bare id or as the populated document.
/// Anything else deserializes into `Unresolved` and never takes part in a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum EntityRef {
    Id(String),
    Expanded(Map<String, Value>),
    Unresolved(Value),
}

impl Default for EntityRef {
    fn default() -> Self {
        Self::Unresolved(Value::Null)
    }
}

impl From<&str> for EntityRef {
    fn from(value: &str) -> Self {
        Self::Id(value.to_string())
    }
}

impl EntityRef {
    /// Plain identifier behind the reference, if there is a usable one.
    pub(crate) fn resolve(&self) -> Option<&str> {
        match self {
            Self::Id(id) => non_blank(id),
            Self::Expanded(fields) => fields
                .get("_id")
                .or_else(|| fields.get("id"))
                .and_then(Value::as_str)
                .and_then(non_blank),
            Self::Unresolved(_) => None,
        }
    }

    pub(crate) fn matches(&self, id: &str) -> bool {
        !id.is_empty() && self.resolve() == Some(id)
    }

    /// Field of a populated reference. Bare ids carry no fields.
    pub(crate) fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Expanded(fields) => fields.get(key),
            _ => None,
        }
    }

    pub(crate) fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded(_))
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> EntityRef {
        serde_json::from_value(value).expect("entity ref")
    }

    #[test]
    fn bare_and_expanded_forms_resolve_to_same_id() {
        let bare = parse(json!("s1"));
        let expanded = parse(json!({"_id": "s1", "subjectTitle": "Chemistry"}));

        assert_eq!(bare.resolve(), Some("s1"));
        assert_eq!(expanded.resolve(), bare.resolve());
        assert!(expanded.matches("s1"));
    }

    #[test]
    fn expanded_form_accepts_plain_id_key() {
        let expanded = parse(json!({"id": "a9", "name": "Lab report"}));
        assert_eq!(expanded.resolve(), Some("a9"));
    }

    #[test]
    fn malformed_shapes_are_unresolved() {
        for raw in [json!(null), json!(42), json!({"name": "no id"}), json!({"_id": 7}), json!("")]
        {
            let reference = parse(raw.clone());
            assert_eq!(reference.resolve(), None, "raw: {raw}");
            assert!(!reference.matches(""), "raw: {raw}");
        }
    }

    #[test]
    fn resolving_a_resolved_id_is_stable() {
        let expanded = parse(json!({"_id": "s1"}));
        let first = expanded.resolve().expect("id");
        let again = EntityRef::from(first);
        assert_eq!(again.resolve(), Some("s1"));
    }

    #[test]
    fn populated_fields_are_reachable() {
        let user = parse(json!({"_id": "u1", "firstName": "Ada", "lastName": "King"}));
        assert_eq!(user.field("firstName"), Some(&json!("Ada")));
        assert!(user.is_expanded());
        assert_eq!(EntityRef::from("u1").field("firstName"), None);
    }
}
