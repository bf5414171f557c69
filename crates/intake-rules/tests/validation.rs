use serde_json::{Value, json};

use intake_rules::rules::{EMAIL_PATTERN, PHONE_PATTERN};
use intake_rules::{
    CompiledRuleSet, RuleKind, ValidationRule, compile, decode_compiled, decode_rules, decompile,
    validate, validate_all,
};

fn rules_from(value: Value) -> Vec<ValidationRule> {
    serde_json::from_value(value).expect("deserialize rules")
}

#[test]
fn empty_rule_list_accepts_anything() {
    for value in [json!(null), json!(""), json!(0), json!([]), json!({"a": 1})] {
        assert_eq!(validate(&value, &[]), None);
    }
}

#[test]
fn first_violation_wins() {
    let rules = rules_from(json!([
        { "type": "required" },
        { "type": "minLength", "value": 5, "message": "Too short" }
    ]));
    assert_eq!(
        validate(&json!(""), &rules).as_deref(),
        Some("This field is required")
    );
    assert_eq!(validate(&json!("abc"), &rules).as_deref(), Some("Too short"));
    assert_eq!(validate(&json!("abcdef"), &rules), None);
}

#[test]
fn validate_all_lists_every_violation_in_order() {
    let rules = rules_from(json!([
        { "type": "minLength", "value": 10 },
        { "type": "pattern", "value": "^[0-9]+$", "message": "Digits only" }
    ]));
    assert_eq!(
        validate_all(&json!("abc"), &rules),
        vec!["Minimum 10 characters".to_string(), "Digits only".to_string()]
    );
}

#[test]
fn required_rejects_falsy_and_blank_values() {
    let rules = vec![ValidationRule::new(RuleKind::Required).with_message("Needed")];
    for value in [json!(null), json!(false), json!(0), json!(""), json!("   ")] {
        assert_eq!(validate(&value, &rules).as_deref(), Some("Needed"), "{value}");
    }
    for value in [json!("x"), json!(7), json!(true), json!([]), json!({})] {
        assert_eq!(validate(&value, &rules), None, "{value}");
    }
}

#[test]
fn length_rules_skip_non_strings() {
    let rules = rules_from(json!([{ "type": "minLength", "value": 5 }]));
    assert_eq!(validate(&json!(42), &rules), None);
    assert_eq!(validate(&json!(["a"]), &rules), None);

    let max = rules_from(json!([{ "type": "maxLength", "value": 3 }]));
    assert_eq!(
        validate(&json!("abcd"), &max).as_deref(),
        Some("Maximum 3 characters")
    );
    assert_eq!(validate(&json!(12345), &max), None);
}

#[test]
fn length_counts_characters_not_bytes() {
    let rules = rules_from(json!([{ "type": "maxLength", "value": 4 }]));
    assert_eq!(validate(&json!("çava"), &rules), None);
}

#[test]
fn numeric_bounds_apply_only_to_numbers() {
    let rules = rules_from(json!([
        { "type": "min", "value": 18 },
        { "type": "max", "value": 99.5 }
    ]));
    assert_eq!(validate(&json!(17), &rules).as_deref(), Some("Minimum value: 18"));
    assert_eq!(validate(&json!(100), &rules).as_deref(), Some("Maximum value: 99.5"));
    assert_eq!(validate(&json!(40), &rules), None);
    assert_eq!(validate(&json!("5"), &rules), None);
}

#[test]
fn numeric_limits_accept_string_values() {
    let rules = rules_from(json!([{ "type": "minLength", "value": "3" }]));
    assert_eq!(
        validate(&json!("ab"), &rules).as_deref(),
        Some("Minimum 3 characters")
    );
}

#[test]
fn pattern_is_unanchored_unless_the_pattern_says_so() {
    let rules = rules_from(json!([{ "type": "pattern", "value": "[0-9]" }]));
    assert_eq!(validate(&json!("abc1"), &rules), None);
    assert_eq!(
        validate(&json!("abc"), &rules).as_deref(),
        Some("Invalid format")
    );
    assert_eq!(validate(&json!(123), &rules), None);
}

#[test]
fn invalid_pattern_is_skipped() {
    let rules = rules_from(json!([{ "type": "pattern", "value": "([a-z" }]));
    assert_eq!(validate(&json!("anything"), &rules), None);
}

#[test]
fn sugar_and_unknown_kinds_are_inert_in_raw_lists() {
    let rules = rules_from(json!([
        { "type": "email" },
        { "type": "phone" },
        { "type": "custom", "value": "whatever" },
        { "type": "somethingNew", "value": 1 }
    ]));
    assert_eq!(rules[3].kind, RuleKind::Unknown);
    assert_eq!(validate(&json!("not an email"), &rules), None);
}

#[test]
fn compile_expands_email_into_pattern() {
    let compiled = compile(&[ValidationRule::new(RuleKind::Email)]);
    let pattern = compiled.pattern.expect("pattern entry");
    assert_eq!(pattern.value, Some(json!(EMAIL_PATTERN)));
    assert_eq!(pattern.message, "Invalid email address");

    let rules = decompile(&CompiledRuleSet {
        pattern: Some(pattern),
        ..Default::default()
    });
    assert_eq!(validate(&json!("someone@example.com"), &rules), None);
    assert_eq!(
        validate(&json!("someone@example"), &rules).as_deref(),
        Some("Invalid email address")
    );
}

#[test]
fn compiled_phone_pattern_accepts_international_numbers() {
    let rules = decompile(&compile(&[ValidationRule::new(RuleKind::Phone)]));
    assert_eq!(rules[0].value, Some(json!(PHONE_PATTERN)));
    assert_eq!(validate(&json!("+905551234567"), &rules), None);
    assert_eq!(
        validate(&json!("0555 123"), &rules).as_deref(),
        Some("Invalid phone number")
    );
}

#[test]
fn later_pattern_rule_overwrites_earlier_sugar() {
    let rules = rules_from(json!([
        { "type": "email" },
        { "type": "pattern", "value": "^x$", "message": "Only x" }
    ]));
    let compiled = compile(&rules);
    let pattern = compiled.pattern.expect("pattern entry");
    assert_eq!(pattern.value, Some(json!("^x$")));
    assert_eq!(pattern.message, "Only x");
}

#[test]
fn compile_synthesises_default_messages() {
    let rules = rules_from(json!([
        { "type": "required" },
        { "type": "minLength", "value": 2 },
        { "type": "maxLength", "value": 8, "message": "" },
        { "type": "min", "value": 1 },
        { "type": "max", "value": 10 },
        { "type": "custom", "value": "rule-name" }
    ]));
    let compiled = serde_json::to_value(compile(&rules)).expect("serialize");
    assert_eq!(
        compiled,
        json!({
            "required": { "value": true, "message": "This field is required" },
            "minLength": { "value": 2, "message": "Minimum 2 characters" },
            "maxLength": { "value": 8, "message": "Maximum 8 characters" },
            "min": { "value": 1, "message": "Minimum value: 1" },
            "max": { "value": 10, "message": "Maximum value: 10" },
            "custom": { "value": "rule-name", "message": "Invalid value" }
        })
    );
}

#[test]
fn compile_after_decompile_is_stable() {
    let rules = rules_from(json!([
        { "type": "max", "value": 3 },
        { "type": "required", "message": "Please answer" },
        { "type": "pattern", "value": "^a" },
        { "type": "minLength", "value": 1 }
    ]));
    let compiled = compile(&rules);
    assert_eq!(compile(&decompile(&compiled)), compiled);
    assert_eq!(CompiledRuleSet::from_rules(&compiled.to_rules()), compiled);
}

#[test]
fn decompile_uses_canonical_key_order() {
    let rules = rules_from(json!([
        { "type": "max", "value": 3 },
        { "type": "required" }
    ]));
    let kinds: Vec<RuleKind> = decompile(&compile(&rules))
        .into_iter()
        .map(|rule| rule.kind)
        .collect();
    assert_eq!(kinds, vec![RuleKind::Required, RuleKind::Max]);
}

#[test]
fn decode_accepts_lists_and_compiled_sets() {
    let from_list = decode_rules(&json!([{ "type": "required" }])).expect("list");
    assert_eq!(from_list.len(), 1);

    let from_compiled = decode_rules(&json!({
        "minLength": { "value": 3, "message": "Three please" }
    }))
    .expect("compiled");
    assert_eq!(from_compiled[0].kind, RuleKind::MinLength);
    assert_eq!(
        validate(&json!("ab"), &from_compiled).as_deref(),
        Some("Three please")
    );

    assert!(decode_rules(&Value::Null).expect("null").is_empty());
    assert!(decode_rules(&json!("nope")).is_err());

    let compiled = decode_compiled(&json!([{ "type": "phone" }])).expect("compile list");
    assert!(compiled.pattern.is_some());
    assert!(decode_compiled(&Value::Null).expect("null").is_empty());
}

#[test]
fn malformed_rule_entries_do_not_discard_their_siblings() {
    let rules = decode_rules(&json!([
        { "type": "required" },
        { "type": null },
        { "type": 42, "value": 3 },
        "not a rule",
        { "type": "maxLength", "value": 3, "message": false }
    ]))
    .expect("list");
    let kinds: Vec<RuleKind> = rules.iter().map(|rule| rule.kind).collect();
    assert_eq!(
        kinds,
        vec![RuleKind::Required, RuleKind::Unknown, RuleKind::Unknown, RuleKind::MaxLength]
    );
    assert_eq!(rules[3].message, None);

    assert_eq!(
        validate(&json!(""), &rules).as_deref(),
        Some("This field is required")
    );
    assert_eq!(
        validate(&json!("abcd"), &rules).as_deref(),
        Some("Maximum 3 characters")
    );
    assert_eq!(validate(&json!("abc"), &rules), None);

    let compiled = decode_compiled(&json!([{ "type": "required" }, { "type": null }]))
        .expect("compile list");
    assert!(compiled.required.is_some());
    assert_eq!(compiled.entries().count(), 1);
}
