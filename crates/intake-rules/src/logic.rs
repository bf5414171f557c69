use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::envelope::{
    current_version, decode, decode_or_default, lenient_list, optional_tag, string_or_empty,
    tag_or_default, warn_if_newer,
};
use crate::error::RulesError;
use crate::value::{strict_equals, to_display_string, to_number};

/// Comparison applied between an answer and a condition's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    In,
    NotIn,
    /// Unrecognised condition; always evaluates to `false`.
    #[default]
    #[serde(other)]
    Unknown,
}

/// What a matching condition does to its question or page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogicAction {
    Show,
    Hide,
    Require,
    Skip,
    #[default]
    #[serde(other)]
    Unknown,
}

/// How a node's children are combined. Anything other than `or` means `and`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogicOperator {
    Or,
    #[default]
    #[serde(other)]
    And,
}

/// A node of a conditional-logic tree.
///
/// Decoding never rejects a node for a bad tag or reference: malformed tags
/// read as `Unknown`/`And` and malformed children are dropped one by one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalLogic {
    #[serde(default, deserialize_with = "tag_or_default")]
    pub condition: ConditionKind,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub question_id: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, deserialize_with = "tag_or_default")]
    pub action: LogicAction,
    #[serde(
        default,
        deserialize_with = "optional_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub operator: Option<LogicOperator>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<ConditionalLogic>,
}

impl ConditionalLogic {
    pub fn new(
        question_id: impl Into<String>,
        condition: ConditionKind,
        value: impl Into<Value>,
        action: LogicAction,
    ) -> Self {
        Self {
            condition,
            question_id: question_id.into(),
            value: value.into(),
            action,
            operator: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(
        mut self,
        operator: LogicOperator,
        children: impl IntoIterator<Item = ConditionalLogic>,
    ) -> Self {
        self.operator = Some(operator);
        self.children = children.into_iter().collect();
        self
    }
}

/// Stored form of a question's or page's logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogicEnvelope {
    #[serde(default, deserialize_with = "lenient_list")]
    pub rules: Vec<ConditionalLogic>,
    #[serde(default = "current_version")]
    pub version: u32,
}

impl Default for LogicEnvelope {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            version: current_version(),
        }
    }
}

impl LogicEnvelope {
    pub fn decode(stored: &Value) -> Result<Self, RulesError> {
        let envelope: Self = decode("conditional logic", stored)?;
        warn_if_newer("conditional logic", envelope.version);
        Ok(envelope)
    }
}

pub fn wrap_logic(rules: &[ConditionalLogic]) -> LogicEnvelope {
    LogicEnvelope {
        rules: rules.to_vec(),
        version: current_version(),
    }
}

/// Reads the rules out of a stored envelope; absent or malformed envelopes yield no rules.
pub fn unwrap_logic(stored: &Value) -> Vec<ConditionalLogic> {
    let envelope: LogicEnvelope = decode_or_default("conditional logic", stored);
    warn_if_newer("conditional logic", envelope.version);
    envelope.rules
}

/// Evaluates a single node against the answers, ignoring its children.
pub fn evaluate_one(node: &ConditionalLogic, answers: &Value) -> bool {
    let answer = answers.get(node.question_id.as_str());
    let expected = Some(&node.value);
    match node.condition {
        ConditionKind::Equals => strict_equals(answer, expected),
        ConditionKind::NotEquals => !strict_equals(answer, expected),
        ConditionKind::Contains => match answer {
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| strict_equals(Some(item), expected)),
            None | Some(Value::Null) => false,
            Some(other) => to_display_string(Some(other))
                .to_lowercase()
                .contains(&to_display_string(expected).to_lowercase()),
        },
        ConditionKind::GreaterThan => to_number(answer) > to_number(expected),
        ConditionKind::LessThan => to_number(answer) < to_number(expected),
        ConditionKind::In => node
            .value
            .as_array()
            .is_some_and(|allowed| allowed.iter().any(|item| strict_equals(answer, Some(item)))),
        ConditionKind::NotIn => node
            .value
            .as_array()
            .is_some_and(|denied| !denied.iter().any(|item| strict_equals(answer, Some(item)))),
        ConditionKind::Unknown => {
            debug!(question_id = %node.question_id, "unknown condition evaluates to false");
            false
        }
    }
}

/// Evaluates top-level nodes; all must hold. An empty list always passes.
pub fn evaluate_tree(nodes: &[ConditionalLogic], answers: &Value) -> bool {
    nodes.iter().all(|node| evaluate_node(node, answers))
}

/// A node's own result is folded with its children using the children's operator.
/// Children are evaluated on their own; grandchildren are not consulted.
pub(crate) fn evaluate_node(node: &ConditionalLogic, answers: &Value) -> bool {
    let result = evaluate_one(node, answers);
    if node.children.is_empty() {
        return result;
    }
    match node.operator.unwrap_or_default() {
        LogicOperator::Or => {
            let children = node
                .children
                .iter()
                .any(|child| evaluate_one(child, answers));
            result || children
        }
        LogicOperator::And => {
            let children = node
                .children
                .iter()
                .all(|child| evaluate_one(child, answers));
            result && children
        }
    }
}
