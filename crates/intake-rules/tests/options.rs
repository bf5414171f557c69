use serde_json::{Value, json};

use intake_rules::{
    NewOption, OptionPatch, OptionsEnvelope, QuestionOption, RulesError, add_option, remove_option,
    reorder_options, reorder_options_lossy, unwrap_options, update_option, wrap_options,
};

fn option(id: &str, order: Option<f64>) -> QuestionOption {
    QuestionOption {
        id: id.into(),
        label: format!("Label {id}"),
        value: id.into(),
        order,
        is_other: None,
    }
}

fn ids(options: &[QuestionOption]) -> Vec<&str> {
    options.iter().map(|option| option.id.as_str()).collect()
}

#[test]
fn wrap_sorts_a_copy_by_order() {
    let input = vec![option("c", Some(2.0)), option("a", None), option("b", Some(1.0))];
    let envelope = wrap_options(&input);
    assert_eq!(ids(&envelope.options), vec!["a", "b", "c"]);
    assert_eq!(ids(&input), vec!["c", "a", "b"]);
    assert_eq!(envelope.version, 1);
}

#[test]
fn wrap_keeps_insertion_order_for_equal_orders() {
    let input = vec![option("x", None), option("y", Some(0.0)), option("z", None)];
    assert_eq!(ids(&wrap_options(&input).options), vec!["x", "y", "z"]);
}

#[test]
fn allow_other_reflects_other_options() {
    assert!(!wrap_options(&[]).allow_other);

    let mut other = option("other", Some(1.0));
    other.is_other = Some(true);
    assert!(wrap_options(&[option("a", Some(0.0)), other]).allow_other);

    let mut explicit_false = option("b", Some(0.0));
    explicit_false.is_other = Some(false);
    assert!(!wrap_options(&[explicit_false]).allow_other);
}

#[test]
fn wrapped_options_serialize_in_camel_case() {
    let mut other = option("other", Some(0.0));
    other.is_other = Some(true);
    let stored = serde_json::to_value(wrap_options(&[other])).expect("serialize");
    assert_eq!(stored["allowOther"], true);
    assert_eq!(stored["options"][0]["isOther"], true);
    assert_eq!(unwrap_options(&stored).len(), 1);
}

#[test]
fn unwrap_defaults_to_empty() {
    assert!(unwrap_options(&Value::Null).is_empty());
    assert!(unwrap_options(&json!({ "allowOther": true })).is_empty());
    assert!(unwrap_options(&json!({ "options": 7 })).is_empty());
    assert!(OptionsEnvelope::decode(&json!({ "options": 7 })).is_err());
}

#[test]
fn add_generates_unique_ids_and_appends() {
    let start = vec![option("a", Some(0.0)), option("b", Some(1.0))];
    let added = add_option(&start, NewOption::new("Crowns", "crowns"));
    assert_eq!(start.len(), 2);
    assert_eq!(added.len(), 3);
    let new = &added[2];
    assert!(new.id.starts_with("option_"));
    assert_eq!(new.order, Some(2.0));
    assert_eq!(new.value, "crowns");

    let again = add_option(&added, NewOption::new("Bridges", "bridges"));
    assert_ne!(again[2].id, again[3].id);
}

#[test]
fn add_with_explicit_order_resorts() {
    let start = vec![option("a", Some(0.0)), option("b", Some(1.0))];
    let added = add_option(
        &start,
        NewOption {
            order: Some(-1.0),
            ..NewOption::new("First", "first")
        },
    );
    assert_eq!(added[0].value, "first");
    assert_eq!(ids(&added)[1..], ["a", "b"]);
}

#[test]
fn update_merges_patch_into_matching_option() {
    let start = vec![option("a", Some(0.0)), option("b", Some(1.0))];
    let patch = OptionPatch {
        label: Some("Other (please specify)".into()),
        is_other: Some(true),
        ..Default::default()
    };
    let updated = update_option(&start, "b", &patch);
    assert_eq!(updated[1].label, "Other (please specify)");
    assert_eq!(updated[1].value, "b");
    assert_eq!(updated[1].order, Some(1.0));
    assert_eq!(updated[1].is_other, Some(true));
    assert_eq!(updated[0], start[0]);
    assert_eq!(start[1].label, "Label b");
}

#[test]
fn update_with_unknown_id_changes_nothing() {
    let start = vec![option("a", Some(0.0))];
    let patch = OptionPatch {
        label: Some("ignored".into()),
        ..Default::default()
    };
    assert_eq!(update_option(&start, "zzz", &patch), start);
}

#[test]
fn remove_filters_matching_option() {
    let start = vec![option("a", Some(0.0)), option("b", Some(1.0))];
    assert_eq!(ids(&remove_option(&start, "a")), vec!["b"]);
    assert_eq!(remove_option(&start, "missing"), start);
}

#[test]
fn reorder_assigns_sequential_orders() {
    let start = vec![option("a", Some(0.0)), option("b", Some(1.0)), option("c", Some(2.0))];
    let reordered = reorder_options(&start, &["c", "a", "b"]).expect("complete order");
    assert_eq!(ids(&reordered), vec!["c", "a", "b"]);
    let orders: Vec<Option<f64>> = reordered.iter().map(|option| option.order).collect();
    assert_eq!(orders, vec![Some(0.0), Some(1.0), Some(2.0)]);
}

#[test]
fn reorder_reports_incomplete_orders() {
    let start = vec![option("a", Some(0.0)), option("b", Some(1.0)), option("c", Some(2.0))];
    match reorder_options(&start, &["c", "a"]) {
        Err(RulesError::IncompleteOrder { missing }) => assert_eq!(missing, vec!["b"]),
        other => panic!("expected incomplete order, got {other:?}"),
    }
    assert!(matches!(
        reorder_options(&start, &["a", "b", "c", "d"]),
        Err(RulesError::UnknownOption(id)) if id == "d"
    ));
    assert!(matches!(
        reorder_options(&start, &["a", "a", "b", "c"]),
        Err(RulesError::DuplicateOption(id)) if id == "a"
    ));
}

#[test]
fn lossy_reorder_drops_unlisted_options() {
    let start = vec![option("a", Some(0.0)), option("b", Some(1.0)), option("c", Some(2.0))];
    let reordered = reorder_options_lossy(&start, &["c", "ghost", "a"]);
    assert_eq!(ids(&reordered), vec!["c", "a"]);
    assert_eq!(reordered[1].order, Some(1.0));
}

#[test]
fn fractional_orders_slot_between_neighbours() {
    let stored = json!({
        "options": [
            { "id": "b", "label": "Bridges", "value": "bridges", "order": 1 },
            { "id": "a", "label": "Crowns", "value": "crowns", "order": 0 },
            { "id": "ab", "label": "Veneers", "value": "veneers", "order": 0.5 }
        ],
        "allowOther": false,
        "version": 1
    });
    let options = unwrap_options(&stored);
    assert_eq!(ids(&options), vec!["a", "ab", "b"]);
    assert_eq!(options[1].order, Some(0.5));
    assert_eq!(ids(&wrap_options(&options).options), vec!["a", "ab", "b"]);
}

#[test]
fn malformed_option_entries_are_skipped_individually() {
    let stored = json!({
        "options": [
            { "id": "a", "label": "Crowns", "value": "crowns", "order": "first" },
            "not an option",
            { "id": 7, "label": "Bridges", "value": "bridges", "isOther": "yes" }
        ]
    });
    let options = unwrap_options(&stored);
    assert_eq!(ids(&options), vec!["a", "7"]);
    assert_eq!(options[0].order, None);
    assert_eq!(options[1].is_other, None);
}
