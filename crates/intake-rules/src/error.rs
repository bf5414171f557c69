use thiserror::Error;

/// Errors surfaced by strict decoding and option-set reordering.
///
/// Rule evaluation itself never fails; malformed rules are skipped.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to decode stored {kind}: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("json encode error: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("option order is missing ids: {}", .missing.join(", "))]
    IncompleteOrder { missing: Vec<String> },
    #[error("option '{0}' is not part of the option set")]
    UnknownOption(String),
    #[error("option '{0}' appears more than once in the requested order")]
    DuplicateOption(String),
}
