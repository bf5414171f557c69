use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logic::{ConditionalLogic, LogicAction, evaluate_node};

/// Resolved state of a question or page for the current answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogicOutcome {
    pub visible: bool,
    pub required: bool,
    pub skipped: bool,
}

impl Default for LogicOutcome {
    fn default() -> Self {
        Self {
            visible: true,
            required: false,
            skipped: false,
        }
    }
}

pub type OutcomeMap = BTreeMap<String, LogicOutcome>;

/// Applies every action group of `nodes` to the default outcome.
///
/// Top-level nodes are grouped by action and each group is evaluated as a tree.
/// A `hide` match wins over a `show` match.
pub fn resolve_outcome(nodes: &[ConditionalLogic], answers: &Value) -> LogicOutcome {
    let mut outcome = LogicOutcome::default();
    if let Some(matched) = group_result(nodes, LogicAction::Show, answers) {
        outcome.visible = matched;
    }
    if let Some(matched) = group_result(nodes, LogicAction::Hide, answers) {
        outcome.visible = outcome.visible && !matched;
    }
    if let Some(matched) = group_result(nodes, LogicAction::Require, answers) {
        outcome.required = matched;
    }
    if let Some(matched) = group_result(nodes, LogicAction::Skip, answers) {
        outcome.skipped = matched;
    }
    outcome
}

/// Resolves outcomes for many questions or pages at once.
pub fn resolve_outcomes<'a, I>(targets: I, answers: &Value) -> OutcomeMap
where
    I: IntoIterator<Item = (&'a str, &'a [ConditionalLogic])>,
{
    targets
        .into_iter()
        .map(|(id, nodes)| (id.to_string(), resolve_outcome(nodes, answers)))
        .collect()
}

fn group_result(nodes: &[ConditionalLogic], action: LogicAction, answers: &Value) -> Option<bool> {
    let mut group = nodes.iter().filter(|node| node.action == action).peekable();
    group.peek()?;
    Some(group.all(|node| evaluate_node(node, answers)))
}
