use clap::{Parser, Subcommand, ValueEnum};
use intake_rules::{
    BlobKind, LogicEnvelope, OptionsEnvelope, PhotoUploadConfig, RatingConfig, SliderConfig,
    blob_schema, decode_compiled, decode_rules, evaluate_tree, resolve_outcome, validate,
    validate_all, wrap_options,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Questionnaire rule helper",
    long_about = "Checks stored validation rules, conditional logic, option sets and question configs against sample answers"
)]
struct Cli {
    /// Log rule evaluation details to stderr (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ConfigKind {
    Photo,
    Slider,
    Rating,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SchemaKind {
    Rules,
    CompiledRules,
    Logic,
    Options,
    Photo,
    Slider,
    Rating,
}

impl From<SchemaKind> for BlobKind {
    fn from(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Rules => BlobKind::Rules,
            SchemaKind::CompiledRules => BlobKind::CompiledRules,
            SchemaKind::Logic => BlobKind::Logic,
            SchemaKind::Options => BlobKind::Options,
            SchemaKind::Photo => BlobKind::Photo,
            SchemaKind::Slider => BlobKind::Slider,
            SchemaKind::Rating => BlobKind::Rating,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Validate a single answer against a rule list or compiled rule set.
    Validate {
        /// JSON file with validation rules (list or compiled set).
        #[arg(long, value_name = "RULES")]
        rules: PathBuf,
        /// Answer to check, as JSON; anything that is not JSON is taken as a string.
        #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
        /// Report every violated rule instead of the first.
        #[arg(long)]
        all: bool,
    },
    /// Print the compiled form of a rule list.
    Compile {
        #[arg(long, value_name = "RULES")]
        rules: PathBuf,
    },
    /// Evaluate conditional logic against an answers file.
    Evaluate {
        /// JSON file with a logic envelope or a bare list of conditions.
        #[arg(long, value_name = "LOGIC")]
        logic: PathBuf,
        /// JSON object mapping question ids to answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Normalise an option set: sort by order and derive allowOther.
    Options {
        /// JSON file with an options envelope or a bare option list.
        #[arg(long, value_name = "OPTIONS")]
        options: PathBuf,
    },
    /// Parse a question config, filling in defaults.
    Config {
        #[arg(long, value_enum)]
        kind: ConfigKind,
        #[arg(long, value_name = "INPUT")]
        input: PathBuf,
    },
    /// Print the JSON Schema of a stored blob.
    Schema {
        #[arg(long, value_enum)]
        kind: SchemaKind,
    },
}

#[derive(Serialize)]
struct EvaluationReport {
    matched: bool,
    outcome: intake_rules::LogicOutcome,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Validate { rules, value, all } => run_validate(&rules, &value, all),
        Command::Compile { rules } => run_compile(&rules),
        Command::Evaluate { logic, answers } => run_evaluate(&logic, &answers),
        Command::Options { options } => run_options(&options),
        Command::Config { kind, input } => run_config(kind, &input),
        Command::Schema { kind } => print_json(&blob_schema(kind.into())?),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn read_json(path: &Path) -> CliResult<Value> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("invalid JSON in {}: {}", path.display(), err))?;
    Ok(value)
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_value_literal(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Accepts either a stored envelope or the bare list it wraps.
fn envelope_from(stored: Value, field: &str) -> Value {
    if stored.is_array() {
        let mut map = Map::new();
        map.insert(field.to_string(), stored);
        Value::Object(map)
    } else {
        stored
    }
}

fn run_validate(rules_path: &Path, raw_value: &str, all: bool) -> CliResult<()> {
    let rules = decode_rules(&read_json(rules_path)?)?;
    let value = parse_value_literal(raw_value);

    let violations = if all {
        validate_all(&value, &rules)
    } else {
        validate(&value, &rules).into_iter().collect()
    };

    if violations.is_empty() {
        println!("valid");
        return Ok(());
    }
    println!("invalid");
    for message in &violations {
        println!("  - {}", message);
    }
    Err("validation failed".into())
}

fn run_compile(rules_path: &Path) -> CliResult<()> {
    let compiled = decode_compiled(&read_json(rules_path)?)?;
    print_json(&compiled)
}

fn run_evaluate(logic_path: &Path, answers_path: &Path) -> CliResult<()> {
    let envelope = LogicEnvelope::decode(&envelope_from(read_json(logic_path)?, "rules"))?;
    let answers = read_json(answers_path)?;
    debug!(rules = envelope.rules.len(), version = envelope.version, "evaluating conditional logic");
    if !answers.is_object() {
        return Err(format!("{} must contain a JSON object of answers", answers_path.display()).into());
    }
    let report = EvaluationReport {
        matched: evaluate_tree(&envelope.rules, &answers),
        outcome: resolve_outcome(&envelope.rules, &answers),
    };
    print_json(&report)
}

fn run_options(options_path: &Path) -> CliResult<()> {
    let envelope = OptionsEnvelope::decode(&envelope_from(read_json(options_path)?, "options"))?;
    print_json(&wrap_options(&envelope.options))
}

fn run_config(kind: ConfigKind, input_path: &Path) -> CliResult<()> {
    let raw = read_json(input_path)?;
    match kind {
        ConfigKind::Photo => print_json(&PhotoUploadConfig::parse(&raw).wrap()),
        ConfigKind::Slider => print_json(&SliderConfig::parse(&raw).wrap()),
        ConfigKind::Rating => print_json(&RatingConfig::parse(&raw).wrap()),
    }
}
