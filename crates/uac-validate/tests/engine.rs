//! ValidationEngine driven the way a form view drives it.

use uac_validate::{
    DEFAULT_EMAIL_MESSAGE, DEFAULT_REQUIRED_MESSAGE, Rule, Schema, ValidationEngine, Values, email,
    required,
};

type Form = ValidationEngine<&'static str, String>;

fn signup(values: &[(&'static str, &str)]) -> Form {
    let initial: Values<&'static str, String> = values
        .iter()
        .map(|(key, value)| (*key, (*value).to_string()))
        .collect();
    let schema = Schema::new()
        .field("name", vec![required()])
        .field("email", vec![required(), email()])
        .field(
            "confirm",
            vec![Rule::new(|value: Option<&String>, all| {
                (value != all.get("email")).then(|| "Emails do not match".to_string())
            })],
        )
        .field("note", vec![]);
    ValidationEngine::new(initial, schema)
}

#[test]
fn validate_all_reports_every_failing_field() {
    let mut form = signup(&[("name", "  "), ("email", "ann@"), ("confirm", "x")]);

    assert!(!form.validate_all());
    insta::assert_json_snapshot!(form.errors(), @r#"
    {
      "confirm": "Emails do not match",
      "email": "Invalid email address",
      "name": "This field is required"
    }
    "#);
    assert!(form.touched().is_empty());
    assert!(!form.is_valid());
}

#[test]
fn fixing_fields_clears_their_errors() {
    let mut form = signup(&[("name", ""), ("email", ""), ("confirm", "")]);
    assert!(!form.validate_all());
    assert_eq!(form.error(&"email"), Some(DEFAULT_REQUIRED_MESSAGE));

    form.set_values(Values::from([
        ("name", "Ann".to_string()),
        ("email", "ann@example.com".to_string()),
        ("confirm", "ann@example.com".to_string()),
    ]));
    assert!(form.validate_all());
    assert!(form.errors().is_empty());
    assert!(form.is_valid());
}

#[test]
fn cross_field_rule_sees_current_values() {
    let mut form = signup(&[("email", "a@b.co"), ("confirm", "a@b.co")]);
    assert!(form.validate_field(&"confirm"));

    form.set_field("email", "c@d.co".into());
    assert!(!form.validate_field(&"confirm"));
    assert_eq!(form.error(&"confirm"), Some("Emails do not match"));
}

#[test]
fn set_values_replaces_the_whole_map() {
    let mut form = signup(&[("name", "Ann"), ("email", "a@b.co")]);
    form.set_values(Values::from([("email", "x@y.io".to_string())]));
    assert_eq!(form.value(&"name"), None);
    assert_eq!(form.value(&"email").map(String::as_str), Some("x@y.io"));

    assert!(!form.validate_field(&"name"));
    assert_eq!(form.error(&"name"), Some(DEFAULT_REQUIRED_MESSAGE));
}

#[test]
fn touch_all_covers_values_and_schema_fields() {
    let mut form = signup(&[("name", "Ann"), ("extra", "1")]);
    form.touch_all();
    let touched: Vec<_> = form.touched().iter().copied().collect();
    assert_eq!(touched, ["confirm", "email", "extra", "name", "note"]);
}

#[test]
fn submit_flow_shows_errors_after_touch_all() {
    let mut form = signup(&[("name", "Ann"), ("email", "bad"), ("confirm", "bad")]);
    assert!(!form.validate_all());
    assert_eq!(form.visible_error(&"email"), None);

    form.touch_all();
    assert_eq!(form.visible_error(&"email"), Some(DEFAULT_EMAIL_MESSAGE));
    assert_eq!(form.visible_error(&"name"), None);
}

#[test]
fn reset_restores_initial_values_and_clears_state() {
    let mut form = signup(&[("name", "Ann"), ("email", "a@b.co")]);
    form.set_field("name", String::new());
    form.touch_field(&"name");
    form.validate_all();
    assert!(!form.errors().is_empty());

    form.reset(None);
    assert_eq!(form.value(&"name").map(String::as_str), Some("Ann"));
    assert!(form.errors().is_empty());
    assert!(form.touched().is_empty());
}

#[test]
fn reset_with_values_does_not_leak_into_later_resets() {
    let mut form = signup(&[("name", "Ann")]);

    let next = Values::from([("name", "Bob".to_string())]);
    form.reset(Some(next.clone()));
    assert_eq!(form.values(), &next);

    // Editing after a reset must not touch the caller's map or the originals.
    form.set_field("name", "Cy".into());
    assert_eq!(next.get("name").map(String::as_str), Some("Bob"));

    form.reset(None);
    assert_eq!(form.value(&"name").map(String::as_str), Some("Ann"));
}
