//! Shape validation for parsed configuration files.
//!
//! Files are parsed into an untyped [`serde_json::Value`] first (YAML and
//! JSON5 both land there) and then checked field by field. Every defect is
//! collected so the user sees the whole list at once instead of fixing one
//! error per run.

use std::fmt;

use serde_json::{Map, Value};

use crate::types::{Action, Configuration, Mode};

// ---------------------------------------------------------------------------
// Violation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    InvalidEnum {
        value: String,
        allowed: Vec<&'static str>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the defect, e.g. `actions[2].label`. Empty for the root.
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        match &self.kind {
            ViolationKind::Missing => write!(f, "{path}: required field is missing"),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
            ViolationKind::InvalidEnum { value, allowed } => write!(
                f,
                "{path}: invalid value '{value}', expected one of: {}",
                allowed.join(", ")
            ),
        }
    }
}

/// Non-empty list of violations, rendered one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {v}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

pub fn validate(value: &Value) -> Result<Configuration, Violations> {
    let mut violations = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(Violations(vec![wrong_type("", "object", value)]));
    };

    let mode = match root.get("type") {
        None => {
            violations.push(missing("type"));
            None
        }
        Some(Value::String(s)) => match Mode::parse(s) {
            Some(m) => Some(m),
            None => {
                violations.push(Violation {
                    path: "type".to_string(),
                    kind: ViolationKind::InvalidEnum {
                        value: s.clone(),
                        allowed: Mode::all().iter().map(|m| m.as_str()).collect(),
                    },
                });
                None
            }
        },
        Some(other) => {
            violations.push(wrong_type("type", "string", other));
            None
        }
    };

    let actions = match root.get("actions") {
        None => {
            violations.push(missing("actions"));
            None
        }
        Some(Value::Array(items)) => {
            let parsed: Vec<Option<Action>> = items
                .iter()
                .enumerate()
                .map(|(i, item)| validate_action(&format!("actions[{i}]"), item, &mut violations))
                .collect();
            parsed.into_iter().collect::<Option<Vec<_>>>()
        }
        Some(other) => {
            violations.push(wrong_type("actions", "array", other));
            None
        }
    };

    match (mode, actions) {
        (Some(mode), Some(actions)) if violations.is_empty() => {
            Ok(Configuration::new(mode, actions))
        }
        _ => Err(Violations(violations)),
    }
}

fn validate_action(path: &str, value: &Value, violations: &mut Vec<Violation>) -> Option<Action> {
    let Some(obj) = value.as_object() else {
        violations.push(wrong_type(path, "object", value));
        return None;
    };

    let label = required_string(obj, path, "label", violations);
    let command = required_string(obj, path, "command", violations);

    // `id: ~` in YAML means the same as leaving the key out.
    let id = match obj.get("id") {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(other) => {
            violations.push(wrong_type(&format!("{path}.id"), "string", other));
            None
        }
    };

    Some(Action {
        id: id?,
        label: label?,
        command: command?,
    })
}

fn required_string(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    let field = format!("{path}.{key}");
    match obj.get(key) {
        None => {
            violations.push(missing(&field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            violations.push(wrong_type(&field, "string", other));
            None
        }
    }
}

fn missing(path: &str) -> Violation {
    Violation {
        path: path.to_string(),
        kind: ViolationKind::Missing,
    }
}

fn wrong_type(path: &str, expected: &'static str, found: &Value) -> Violation {
    Violation {
        path: path.to_string(),
        kind: ViolationKind::WrongType {
            expected,
            found: type_name(found),
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_actions_with_and_without_id() {
        let value = json!({
            "type": "parallel",
            "actions": [
                { "id": "lint", "label": "Lint", "command": "eslint ." },
                { "label": "Build", "command": "npm run build" },
            ]
        });
        let cfg = validate(&value).unwrap();
        assert_eq!(cfg.mode, Mode::Parallel);
        assert_eq!(cfg.actions.len(), 2);
        assert_eq!(cfg.actions[0].id.as_deref(), Some("lint"));
        assert_eq!(cfg.actions[1].id, None);
    }

    #[test]
    fn rejects_unknown_mode() {
        let value = json!({ "type": "concurrent", "actions": [] });
        let err = validate(&value).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(
            &err.0[0].kind,
            ViolationKind::InvalidEnum { value, .. } if value == "concurrent"
        ));
    }

    #[test]
    fn collects_every_violation() {
        let value = json!({
            "actions": [
                { "label": 3, "command": "ok" },
                { "id": ["x"] },
                "not-an-object",
            ]
        });
        let err = validate(&value).unwrap_err();
        let paths: Vec<&str> = err.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "type",
                "actions[0].label",
                "actions[1].label",
                "actions[1].command",
                "actions[1].id",
                "actions[2]",
            ]
        );
    }

    #[test]
    fn rejects_non_object_root() {
        let err = validate(&json!(["series"])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.to_string(), "  - <root>: expected object, found array");
    }

    #[test]
    fn actions_must_be_an_array() {
        let err = validate(&json!({ "type": "series", "actions": "lint" })).unwrap_err();
        assert_eq!(err.0[0].path, "actions");
        assert!(err.to_string().contains("expected array, found string"));
    }

    #[test]
    fn null_id_is_treated_as_absent() {
        let value = json!({
            "type": "series",
            "actions": [{ "id": null, "label": "Build", "command": "make" }]
        });
        let cfg = validate(&value).unwrap();
        assert_eq!(cfg.actions[0].id, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let value = json!({
            "type": "series",
            "extra": true,
            "actions": [{ "label": "Build", "command": "make", "cwd": "x" }]
        });
        assert!(validate(&value).is_ok());
    }

    #[test]
    fn round_trips_through_yaml_and_json() {
        let cfg = Configuration::new(
            Mode::Series,
            vec![
                Action::new("Fix formatting", "prettier --write .").with_id("prettier"),
                Action::new("Build", "npm run build"),
            ],
        );

        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let from_yaml: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(validate(&from_yaml).unwrap(), cfg);

        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let from_json: Value = json5::from_str(&json).unwrap();
        assert_eq!(validate(&from_json).unwrap(), cfg);
    }
}
