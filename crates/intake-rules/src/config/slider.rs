use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field;
use crate::envelope::Versioned;

pub const DEFAULT_MIN: f64 = 0.0;
pub const DEFAULT_MAX: f64 = 100.0;
pub const DEFAULT_STEP: f64 = 1.0;

/// Range input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub show_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_label: Option<String>,
    pub show_value: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            step: DEFAULT_STEP,
            show_labels: true,
            left_label: None,
            right_label: None,
            show_value: true,
        }
    }
}

impl SliderConfig {
    /// Flags default to `true` unless explicitly `false`.
    pub fn parse(raw: &Value) -> Self {
        Self {
            min: field(raw, "min").unwrap_or(DEFAULT_MIN),
            max: field(raw, "max").unwrap_or(DEFAULT_MAX),
            step: field(raw, "step").unwrap_or(DEFAULT_STEP),
            show_labels: field::<bool>(raw, "showLabels") != Some(false),
            left_label: field(raw, "leftLabel"),
            right_label: field(raw, "rightLabel"),
            show_value: field::<bool>(raw, "showValue") != Some(false),
        }
    }

    pub fn wrap(&self) -> Versioned<SliderConfig> {
        Versioned::new(self.clone())
    }
}
