//! List-pipeline parsing behavior through the public surface.

use std::collections::HashMap;

use propdesk_core::listing::{Op, QuerySpec, SortKey};

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn pagination_boundaries() {
    // page=1,limit=2 starts at the first row
    let spec = QuerySpec::from_params(&params(&[("page", "1"), ("limit", "2")]));
    assert_eq!((spec.offset(), spec.limit), (0, 2));

    // page=3,limit=2 skips the first four
    let spec = QuerySpec::from_params(&params(&[("page", "3"), ("limit", "2")]));
    assert_eq!((spec.offset(), spec.limit), (4, 2));

    // all=true wins over page/limit
    let spec = QuerySpec::from_params(&params(&[
        ("all", "true"),
        ("page", "3"),
        ("limit", "2"),
    ]));
    assert!(spec.all);
}

#[test]
fn malformed_pagination_recovers_to_defaults() {
    for bad in ["0", "-1", "two", ""] {
        let spec = QuerySpec::from_params(&params(&[("page", bad), ("limit", bad)]));
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 100);
    }
}

#[test]
fn filters_exclude_reserved_keys_and_empty_values() {
    let spec = QuerySpec::from_params(&params(&[
        ("status", "active"),
        ("city", ""),
        ("page", "2"),
        ("sort", "-created_at"),
        ("search", "sea view"),
    ]));
    assert_eq!(spec.conditions.len(), 1);
    assert_eq!(spec.conditions[0].field, "status");
    assert_eq!(spec.search.as_deref(), Some("sea view"));
}

#[test]
fn operator_filters_parse() {
    let spec = QuerySpec::from_params(&params(&[
        ("rent_amount[gte]", "500"),
        ("rent_amount[lte]", "1500"),
        ("status[in]", "available,pending"),
    ]));
    assert_eq!(spec.conditions.len(), 3);
    assert!(spec.conditions.iter().any(|c| c.op == Op::Gte));
    assert!(spec.conditions.iter().any(|c| c.op == Op::Lte));
    assert!(spec.conditions.iter().any(|c| c.op == Op::In));
}

#[test]
fn date_range_is_equivalent_to_explicit_date_operators() {
    let range = QuerySpec::from_params(&params(&[
        ("start_date", "2024-01-01"),
        ("end_date", "2024-01-31"),
    ]));
    let explicit = QuerySpec::from_params(&params(&[
        ("date[gte]", "2024-01-01"),
        ("date[lte]", "2024-01-31"),
    ]));
    assert_eq!(range.conditions, explicit.conditions);
}

#[test]
fn date_range_takes_precedence_over_literal_date() {
    let spec = QuerySpec::from_params(&params(&[
        ("date", "2020-05-05"),
        ("start_date", "2024-01-01"),
        ("end_date", "2024-01-31"),
    ]));
    assert_eq!(spec.conditions.len(), 2);
    assert!(spec.conditions.iter().all(|c| c.field == "date"));
    assert!(spec.conditions.iter().all(|c| c.value != "2020-05-05"));
}

#[test]
fn sort_spec_parses_direction_prefixes() {
    let spec = QuerySpec::from_params(&params(&[("sort", "-rent_amount,city")]));
    assert_eq!(
        spec.sort,
        vec![
            SortKey {
                field: "rent_amount".to_string(),
                descending: true
            },
            SortKey {
                field: "city".to_string(),
                descending: false
            },
        ]
    );
}
