//! Configuration normalization.
//!
//! The host hands over a loosely-typed object: flags may be real booleans or
//! stringified ones, and any key may be missing. Normalization never fails.
//! A missing key takes its default; any present value counts as enabled only
//! when it is exactly `true` or the string `"true"`.

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::Value;

use crate::tools::ToolId;

/// Enable flag for every tool in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolsStatus {
    enabled: [bool; ToolId::COUNT],
}

impl ToolsStatus {
    /// Every tool set to the same flag.
    pub fn all(enabled: bool) -> Self {
        Self {
            enabled: [enabled; ToolId::COUNT],
        }
    }

    pub fn is_enabled(&self, id: ToolId) -> bool {
        self.enabled[id.index()]
    }

    pub fn set(&mut self, id: ToolId, enabled: bool) {
        self.enabled[id.index()] = enabled;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ToolId, bool)> + '_ {
        ToolId::ALL.into_iter().map(|id| (id, self.is_enabled(id)))
    }
}

impl Default for ToolsStatus {
    fn default() -> Self {
        Self::all(true)
    }
}

impl Serialize for ToolsStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ToolId::COUNT))?;
        for (id, enabled) in self.iter() {
            map.serialize_entry(id.as_str(), &enabled)?;
        }
        map.end()
    }
}

/// Fully-defaulted interaction settings.
///
/// Replaced wholesale on every render; never merged with a previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionConfig {
    pub tools_status: ToolsStatus,
    /// Enter inserts a line-break marker.
    pub allow_new_line: bool,
    /// When false, space behaves as tab inside the field.
    pub authorize_white_space: bool,
    pub use_gap_expression: bool,
    /// Authored LaTeX with `\taoGap` markers. Only meaningful in gap mode.
    pub gap_expression: String,
}

impl InteractionConfig {
    /// Normalize a raw host configuration.
    ///
    /// Anything that is not an object yields the defaults.
    pub fn from_value(raw: &Value) -> Self {
        let mut tools_status = ToolsStatus::default();
        for id in ToolId::ALL {
            tools_status.set(id, to_boolean(raw.get(id.config_key()), true));
        }

        let gap_expression = raw
            .get("gapExpression")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            tools_status,
            allow_new_line: to_boolean(raw.get("allowNewLine"), false),
            authorize_white_space: to_boolean(raw.get("authorizeWhiteSpace"), false),
            use_gap_expression: to_boolean(raw.get("useGapExpression"), false),
            gap_expression,
        }
    }

    /// Space key behaviour handed to every field.
    pub fn space_behaves_like_tab(&self) -> bool {
        !self.authorize_white_space
    }
}

/// Coerce a loosely-typed flag.
///
/// `None` means the key was absent. `null`, numbers, and strings other than
/// `"true"` are all false.
pub fn to_boolean(value: Option<&Value>, default: bool) -> bool {
    match value {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(_) => false,
    }
}
