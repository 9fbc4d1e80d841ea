//! ListQuery codec: canonical form, fallback and round-trip properties.

use proptest::prelude::*;
use uac_query::{
    DEFAULT_LIMIT, DEFAULT_PAGE, ListQuery, ListQueryCodec, QueryCodec, QueryState, RawQuery,
    RawValue,
};

fn codec() -> ListQueryCodec {
    ListQueryCodec::default()
}

#[test]
fn default_state_builds_empty_query() {
    assert!(codec().build(&ListQuery::default()).is_empty());
}

#[test]
fn empty_query_parses_to_defaults() {
    let parsed = codec().parse(&RawQuery::new());
    assert_eq!(parsed, ListQuery::default());
    assert_eq!(parsed.page, DEFAULT_PAGE);
    assert_eq!(parsed.limit, DEFAULT_LIMIT);
}

#[test]
fn malformed_values_fall_back_to_defaults() {
    let raw = RawQuery::new()
        .with("page", "abc")
        .with("limit", "0")
        .with("search", RawValue::Null);
    assert_eq!(codec().parse(&raw), ListQuery::default());

    let raw = RawQuery::new()
        .with("page", "-2")
        .with("limit", RawValue::List(vec![None, Some("10".into())]));
    assert_eq!(codec().parse(&raw), ListQuery::default());
}

#[test]
fn sequence_values_use_first_element() {
    let raw = RawQuery::from_query_string("page=3&page=9&search=+ann+");
    let parsed = codec().parse(&raw);
    assert_eq!(parsed.page, 3);
    assert_eq!(parsed.search, "ann");
}

#[test]
fn build_only_emits_non_default_keys() {
    let state = ListQuery {
        page: 1,
        limit: 40,
        search: "ann".into(),
    };
    assert_eq!(codec().build(&state), QueryState::new().with("search", "ann"));

    let state = ListQuery {
        page: 3,
        limit: 10,
        search: String::new(),
    };
    insta::assert_json_snapshot!(codec().build(&state), @r#"
    {
      "limit": "10",
      "page": "3"
    }
    "#);
}

fn trimmed_search() -> impl Strategy<Value = String> {
    "[ a-zA-Z0-9@._+&=%-]{0,16}".prop_map(|text| text.trim().to_string())
}

fn valid_state() -> impl Strategy<Value = ListQuery> {
    (1..=u32::MAX, 1..=u32::MAX, trimmed_search()).prop_map(|(page, limit, search)| ListQuery {
        page,
        limit,
        search,
    })
}

proptest! {
    #[test]
    fn parse_inverts_build(state in valid_state()) {
        let codec = codec();
        let built = codec.build(&state);
        prop_assert_eq!(codec.parse(&RawQuery::from(&built)), state);
    }

    #[test]
    fn parse_inverts_build_through_query_string(state in valid_state()) {
        let codec = codec();
        let encoded = codec.build(&state).to_query_string();
        prop_assert_eq!(codec.parse(&RawQuery::from_query_string(&encoded)), state);
    }

    #[test]
    fn build_never_emits_default_values(state in valid_state()) {
        let built = codec().build(&state);
        prop_assert_ne!(built.get("page"), Some("1"));
        prop_assert_ne!(built.get("limit"), Some("40"));
        prop_assert_ne!(built.get("search"), Some(""));
    }

    #[test]
    fn parse_is_total_on_arbitrary_input(page in ".*", limit in ".*", search in ".*") {
        let raw = RawQuery::new()
            .with("page", page)
            .with("limit", limit)
            .with("search", search);
        let parsed = codec().parse(&raw);
        prop_assert!(parsed.page >= 1);
        prop_assert!(parsed.limit >= 1);
        prop_assert_eq!(parsed.search.trim(), parsed.search.as_str());
    }
}
