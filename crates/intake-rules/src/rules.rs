use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::{decode, decode_each, optional_or_none, tag_or_default};
use crate::error::RulesError;
use crate::value::{char_len, is_truthy, to_display_string, to_number};

/// Pattern an `email` rule compiles into.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
/// Pattern a `phone` rule compiles into.
pub const PHONE_PATTERN: &str = r"^[+]?[1-9][0-9]{0,15}$";

/// Kinds of per-question validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
    Email,
    Phone,
    Custom,
    /// Any tag this engine does not know; ignored everywhere.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single declarative validation rule as authored for a question.
///
/// A `type` that is missing, `null` or not a string reads as `Unknown`, and a
/// non-string `message` reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationRule {
    #[serde(rename = "type", default, deserialize_with = "tag_or_default")]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(
        default,
        deserialize_with = "optional_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            value: None,
            message: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The authored message, or the default for this kind when it is missing or empty.
    pub fn effective_message(&self) -> String {
        self.message
            .as_deref()
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_message(self.kind, self.value.as_ref()))
    }
}

/// One entry of a compiled rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompiledRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub message: String,
}

impl CompiledRule {
    fn new(value: Option<Value>, message: String) -> Self {
        Self { value, message }
    }
}

/// Canonical form of a rule list, keyed by effective rule kind.
///
/// `email` and `phone` rules land in `pattern`, so only one pattern
/// constraint survives compilation: the last one in list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompiledRuleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<CompiledRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<CompiledRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<CompiledRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<CompiledRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<CompiledRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<CompiledRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CompiledRule>,
}

impl CompiledRuleSet {
    pub fn from_rules(rules: &[ValidationRule]) -> Self {
        compile(rules)
    }

    pub fn to_rules(&self) -> Vec<ValidationRule> {
        decompile(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Present entries in canonical key order.
    pub fn entries(&self) -> impl Iterator<Item = (RuleKind, &CompiledRule)> {
        [
            (RuleKind::Required, &self.required),
            (RuleKind::MinLength, &self.min_length),
            (RuleKind::MaxLength, &self.max_length),
            (RuleKind::Pattern, &self.pattern),
            (RuleKind::Min, &self.min),
            (RuleKind::Max, &self.max),
            (RuleKind::Custom, &self.custom),
        ]
        .into_iter()
        .filter_map(|(kind, entry)| entry.as_ref().map(|entry| (kind, entry)))
    }
}

/// Message used when a rule carries none of its own.
pub fn default_message(kind: RuleKind, value: Option<&Value>) -> String {
    match kind {
        RuleKind::Required => "This field is required".to_string(),
        RuleKind::MinLength => format!("Minimum {} characters", to_display_string(value)),
        RuleKind::MaxLength => format!("Maximum {} characters", to_display_string(value)),
        RuleKind::Pattern => "Invalid format".to_string(),
        RuleKind::Min => format!("Minimum value: {}", to_display_string(value)),
        RuleKind::Max => format!("Maximum value: {}", to_display_string(value)),
        RuleKind::Email => "Invalid email address".to_string(),
        RuleKind::Phone => "Invalid phone number".to_string(),
        RuleKind::Custom | RuleKind::Unknown => "Invalid value".to_string(),
    }
}

/// Compiles rules in list order; later rules overwrite earlier ones of the same effective kind.
pub fn compile(rules: &[ValidationRule]) -> CompiledRuleSet {
    let mut compiled = CompiledRuleSet::default();
    for rule in rules {
        let message = rule.effective_message();
        match rule.kind {
            RuleKind::Required => {
                compiled.required = Some(CompiledRule::new(Some(Value::Bool(true)), message))
            }
            RuleKind::MinLength => {
                compiled.min_length = Some(CompiledRule::new(rule.value.clone(), message))
            }
            RuleKind::MaxLength => {
                compiled.max_length = Some(CompiledRule::new(rule.value.clone(), message))
            }
            RuleKind::Pattern => {
                compiled.pattern = Some(CompiledRule::new(rule.value.clone(), message))
            }
            RuleKind::Min => compiled.min = Some(CompiledRule::new(rule.value.clone(), message)),
            RuleKind::Max => compiled.max = Some(CompiledRule::new(rule.value.clone(), message)),
            RuleKind::Email => {
                compiled.pattern = Some(CompiledRule::new(
                    Some(Value::String(EMAIL_PATTERN.to_string())),
                    message,
                ))
            }
            RuleKind::Phone => {
                compiled.pattern = Some(CompiledRule::new(
                    Some(Value::String(PHONE_PATTERN.to_string())),
                    message,
                ))
            }
            RuleKind::Custom => {
                compiled.custom = Some(CompiledRule::new(rule.value.clone(), message))
            }
            RuleKind::Unknown => debug!("skipping validation rule with unknown type"),
        }
    }
    compiled
}

/// Rebuilds a rule list from a compiled set.
///
/// Whether a pattern came from an `email` or `phone` rule is not recoverable.
pub fn decompile(compiled: &CompiledRuleSet) -> Vec<ValidationRule> {
    compiled
        .entries()
        .map(|(kind, entry)| ValidationRule {
            kind,
            value: entry.value.clone(),
            message: Some(entry.message.clone()),
        })
        .collect()
}

/// Returns the message of the first violated rule, in list order.
pub fn validate(value: &Value, rules: &[ValidationRule]) -> Option<String> {
    rules.iter().find_map(|rule| check_rule(value, rule))
}

/// Returns every violated message, in list order.
pub fn validate_all(value: &Value, rules: &[ValidationRule]) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| check_rule(value, rule))
        .collect()
}

fn check_rule(value: &Value, rule: &ValidationRule) -> Option<String> {
    let limit = || to_number(rule.value.as_ref());
    let violated = match rule.kind {
        RuleKind::Required => {
            !is_truthy(value) || value.as_str().is_some_and(|text| text.trim().is_empty())
        }
        RuleKind::MinLength => value
            .as_str()
            .is_some_and(|text| (char_len(text) as f64) < limit()),
        RuleKind::MaxLength => value
            .as_str()
            .is_some_and(|text| (char_len(text) as f64) > limit()),
        RuleKind::Min => value.as_f64().is_some_and(|number| number < limit()),
        RuleKind::Max => value.as_f64().is_some_and(|number| number > limit()),
        RuleKind::Pattern => value
            .as_str()
            .is_some_and(|text| !pattern_matches(rule.value.as_ref(), text)),
        // Only `compile` expands these; a raw list does not check them.
        RuleKind::Email | RuleKind::Phone | RuleKind::Custom | RuleKind::Unknown => false,
    };
    violated.then(|| rule.effective_message())
}

fn pattern_matches(pattern: Option<&Value>, text: &str) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    let source = to_display_string(Some(pattern));
    match Regex::new(&source) {
        Ok(regex) => regex.is_match(text),
        Err(error) => {
            warn!(pattern = %source, %error, "skipping validation pattern that does not compile");
            true
        }
    }
}

/// Decodes stored validation data: either a rule list or a compiled rule set.
pub fn decode_rules(stored: &Value) -> Result<Vec<ValidationRule>, RulesError> {
    match stored {
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => decode::<CompiledRuleSet>("compiled rule set", stored)
            .map(|compiled| decompile(&compiled)),
        Value::Array(items) => Ok(decode_each("validation rules", items)),
        _ => decode("validation rules", stored),
    }
}

/// Decodes a stored compiled rule set, compiling it first when given a rule list.
pub fn decode_compiled(stored: &Value) -> Result<CompiledRuleSet, RulesError> {
    match stored {
        Value::Array(items) => Ok(compile(&decode_each::<ValidationRule>(
            "validation rules",
            items,
        ))),
        Value::Null => Ok(CompiledRuleSet::default()),
        _ => decode("compiled rule set", stored),
    }
}
