use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field;
use crate::envelope::Versioned;

pub const DEFAULT_SCALE: u32 = 5;
/// Largest scale a rating question may use; larger stored scales are clamped.
pub const MAX_SCALE: u32 = 100;

/// Star/point rating configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RatingConfig {
    pub scale: u32,
    pub show_labels: bool,
    pub labels: Vec<String>,
    pub allow_half: bool,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            show_labels: true,
            labels: Vec::new(),
            allow_half: false,
        }
    }
}

impl RatingConfig {
    pub fn parse(raw: &Value) -> Self {
        Self {
            scale: field::<u32>(raw, "scale")
                .unwrap_or(DEFAULT_SCALE)
                .min(MAX_SCALE),
            show_labels: field::<bool>(raw, "showLabels") != Some(false),
            labels: field(raw, "labels").unwrap_or_default(),
            allow_half: field(raw, "allowHalf").unwrap_or(false),
        }
    }

    pub fn wrap(&self) -> Versioned<RatingConfig> {
        Versioned::new(self.clone())
    }

    /// Authored labels, or the defaults for this scale when none were given.
    pub fn display_labels(&self) -> Vec<String> {
        if self.labels.is_empty() {
            default_rating_labels(self.scale)
        } else {
            self.labels.clone()
        }
    }
}

/// Labels for common scales; other scales are numbered from 1, up to [`MAX_SCALE`].
pub fn default_rating_labels(scale: u32) -> Vec<String> {
    match scale.min(MAX_SCALE) {
        3 => ["Poor", "Good", "Excellent"].map(String::from).to_vec(),
        5 => ["Very Poor", "Poor", "Average", "Good", "Excellent"]
            .map(String::from)
            .to_vec(),
        scale => (1..=scale).map(|point| point.to_string()).collect(),
    }
}
