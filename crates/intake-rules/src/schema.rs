use schemars::{JsonSchema, schema_for};
use serde_json::Value;

use crate::config::{PhotoUploadConfig, RatingConfig, SliderConfig};
use crate::envelope::Versioned;
use crate::error::RulesError;
use crate::logic::LogicEnvelope;
use crate::options::OptionsEnvelope;
use crate::rules::{CompiledRuleSet, ValidationRule};

/// Blob shapes stored in questionnaire JSON columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Rules,
    CompiledRules,
    Logic,
    Options,
    Photo,
    Slider,
    Rating,
}

impl BlobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobKind::Rules => "rules",
            BlobKind::CompiledRules => "compiled_rules",
            BlobKind::Logic => "logic",
            BlobKind::Options => "options",
            BlobKind::Photo => "photo",
            BlobKind::Slider => "slider",
            BlobKind::Rating => "rating",
        }
    }
}

/// JSON Schema describing the stored form of `kind`.
pub fn blob_schema(kind: BlobKind) -> Result<Value, RulesError> {
    match kind {
        BlobKind::Rules => schema_value::<Vec<ValidationRule>>(),
        BlobKind::CompiledRules => schema_value::<CompiledRuleSet>(),
        BlobKind::Logic => schema_value::<LogicEnvelope>(),
        BlobKind::Options => schema_value::<OptionsEnvelope>(),
        BlobKind::Photo => schema_value::<Versioned<PhotoUploadConfig>>(),
        BlobKind::Slider => schema_value::<Versioned<SliderConfig>>(),
        BlobKind::Rating => schema_value::<Versioned<RatingConfig>>(),
    }
}

fn schema_value<T: JsonSchema>() -> Result<Value, RulesError> {
    serde_json::to_value(schema_for!(T)).map_err(RulesError::Encode)
}
