use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Series,
    Parallel,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::Series, Mode::Parallel]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Series => "series",
            Mode::Parallel => "parallel",
        }
    }

    /// Exact, case-sensitive match against the on-disk names.
    pub fn parse(s: &str) -> Option<Mode> {
        Mode::all().iter().copied().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub command: String,
}

impl Action {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            command: command.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The identifier usable for selection. An empty string counts as absent.
    pub fn selectable_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "type")]
    pub mode: Mode,
    pub actions: Vec<Action>,
}

impl Configuration {
    pub fn new(mode: Mode, actions: Vec<Action>) -> Self {
        Self { mode, actions }
    }

    /// Parse an untyped value, reporting every structural defect.
    pub fn from_value(value: &serde_json::Value) -> crate::Result<Self> {
        crate::schema::validate(value).map_err(crate::ConcatenateError::SchemaValidation)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
