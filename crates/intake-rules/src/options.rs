use std::cmp::Ordering;
use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::envelope::{
    current_version, decode, decode_or_default, lenient_list, optional_or_none, string_or_empty,
    warn_if_newer,
};
use crate::error::RulesError;

/// A selectable option of a choice-type question.
///
/// `order` is any JSON number, so an option slotted in between two others
/// (`0.5`) keeps its place. Fields of the wrong type read as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub label: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub value: String,
    #[serde(
        default,
        deserialize_with = "optional_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<f64>,
    #[serde(
        default,
        deserialize_with = "optional_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_other: Option<bool>,
}

impl QuestionOption {
    pub fn is_other_option(&self) -> bool {
        self.is_other == Some(true)
    }

    fn merged(&self, patch: &OptionPatch) -> Self {
        Self {
            id: self.id.clone(),
            label: patch.label.clone().unwrap_or_else(|| self.label.clone()),
            value: patch.value.clone().unwrap_or_else(|| self.value.clone()),
            order: patch.order.or(self.order),
            is_other: patch.is_other.or(self.is_other),
        }
    }
}

/// An option about to be added; its id is generated on insert.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_other: Option<bool>,
}

impl NewOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            order: None,
            is_other: None,
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_other: Option<bool>,
}

/// Stored form of an option set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionsEnvelope {
    #[serde(default, deserialize_with = "lenient_list")]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub allow_other: bool,
    #[serde(default = "current_version")]
    pub version: u32,
}

impl Default for OptionsEnvelope {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            allow_other: false,
            version: current_version(),
        }
    }
}

impl OptionsEnvelope {
    pub fn decode(stored: &Value) -> Result<Self, RulesError> {
        let envelope: Self = decode("question options", stored)?;
        warn_if_newer("question options", envelope.version);
        Ok(envelope)
    }
}

/// Sorts a copy by `order` and derives `allowOther`.
pub fn wrap_options(options: &[QuestionOption]) -> OptionsEnvelope {
    let options = sorted_by_order(options.to_vec());
    let allow_other = options.iter().any(QuestionOption::is_other_option);
    OptionsEnvelope {
        options,
        allow_other,
        version: current_version(),
    }
}

pub fn unwrap_options(stored: &Value) -> Vec<QuestionOption> {
    let envelope: OptionsEnvelope = decode_or_default("question options", stored);
    warn_if_newer("question options", envelope.version);
    envelope.options
}

/// Appends an option with a fresh id; `order` defaults to the append position.
pub fn add_option(existing: &[QuestionOption], option: NewOption) -> Vec<QuestionOption> {
    let order = option.order.unwrap_or(existing.len() as f64);
    let mut options = existing.to_vec();
    options.push(QuestionOption {
        id: generate_option_id(),
        label: option.label,
        value: option.value,
        order: Some(order),
        is_other: option.is_other,
    });
    sorted_by_order(options)
}

/// Merges `patch` into the option with `id`; unknown ids leave the list unchanged.
pub fn update_option(existing: &[QuestionOption], id: &str, patch: &OptionPatch) -> Vec<QuestionOption> {
    existing
        .iter()
        .map(|option| {
            if option.id == id {
                option.merged(patch)
            } else {
                option.clone()
            }
        })
        .collect()
}

pub fn remove_option(existing: &[QuestionOption], id: &str) -> Vec<QuestionOption> {
    existing
        .iter()
        .filter(|option| option.id != id)
        .cloned()
        .collect()
}

/// Rebuilds the list in the order of `ordered_ids`, renumbering `order` from zero.
///
/// `ordered_ids` must name every option exactly once.
pub fn reorder_options<S: AsRef<str>>(
    existing: &[QuestionOption],
    ordered_ids: &[S],
) -> Result<Vec<QuestionOption>, RulesError> {
    let mut seen = HashSet::new();
    for id in ordered_ids {
        let id = id.as_ref();
        if !seen.insert(id) {
            return Err(RulesError::DuplicateOption(id.to_string()));
        }
        if !existing.iter().any(|option| option.id == id) {
            return Err(RulesError::UnknownOption(id.to_string()));
        }
    }
    let missing: Vec<String> = existing
        .iter()
        .filter(|option| !seen.contains(option.id.as_str()))
        .map(|option| option.id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(RulesError::IncompleteOrder { missing });
    }
    Ok(reorder_options_lossy(existing, ordered_ids))
}

/// Like [`reorder_options`], but options absent from `ordered_ids` are dropped
/// and unknown ids are ignored.
pub fn reorder_options_lossy<S: AsRef<str>>(
    existing: &[QuestionOption],
    ordered_ids: &[S],
) -> Vec<QuestionOption> {
    ordered_ids
        .iter()
        .filter_map(|id| existing.iter().find(|option| option.id == id.as_ref()))
        .enumerate()
        .map(|(index, option)| QuestionOption {
            order: Some(index as f64),
            ..option.clone()
        })
        .collect()
}

fn sorted_by_order(mut options: Vec<QuestionOption>) -> Vec<QuestionOption> {
    options.sort_by(|left, right| {
        let (left, right) = (left.order.unwrap_or(0.0), right.order.unwrap_or(0.0));
        left.partial_cmp(&right).unwrap_or(Ordering::Equal)
    });
    options
}

fn generate_option_id() -> String {
    format!("option_{}", Uuid::now_v7().simple())
}
