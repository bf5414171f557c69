#![allow(missing_docs)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod logic;
pub mod options;
pub mod outcome;
pub mod rules;
pub mod schema;
pub mod value;

pub use config::{
    PhotoType, PhotoUploadConfig, RatingConfig, Resolution, SliderConfig, default_photo_types,
    default_rating_labels,
};
pub use envelope::{CURRENT_VERSION, Versioned};
pub use error::RulesError;
pub use logic::{
    ConditionKind, ConditionalLogic, LogicAction, LogicEnvelope, LogicOperator, evaluate_one,
    evaluate_tree, unwrap_logic, wrap_logic,
};
pub use options::{
    NewOption, OptionPatch, OptionsEnvelope, QuestionOption, add_option, remove_option,
    reorder_options, reorder_options_lossy, unwrap_options, update_option, wrap_options,
};
pub use outcome::{LogicOutcome, OutcomeMap, resolve_outcome, resolve_outcomes};
pub use rules::{
    CompiledRule, CompiledRuleSet, RuleKind, ValidationRule, compile, decode_compiled,
    decode_rules, decompile, validate, validate_all,
};
pub use schema::{BlobKind, blob_schema};
