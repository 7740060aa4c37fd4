use optgate_domain::flag::{Category, CategorySet, Flag};
use optgate_domain::source::ConfigSource;
use serde_json::json;

#[test]
fn category_strings_round_trip() {
    for category in Category::ALL {
        assert_eq!(category.as_str().parse::<Category>(), Ok(category));
    }
    assert_eq!(" Forcing ".parse::<Category>(), Ok(Category::Forcing));
    assert!("physics".parse::<Category>().is_err());
}

#[test]
fn category_set_parses_lists() {
    let set = CategorySet::parse_list("forcing, algorithm").unwrap();
    assert!(set.includes(Category::Forcing));
    assert!(set.includes(Category::Algorithm));
    assert!(!set.includes(Category::Diagnostic));

    assert_eq!(CategorySet::parse_list("*"), Ok(CategorySet::ALL));
    assert_eq!(CategorySet::parse_list(" , "), Ok(CategorySet::empty()));
}

#[test]
fn category_set_rejects_unknown_entries() {
    let err = CategorySet::parse_list("forcing,bogus").unwrap_err();
    assert_eq!(err.value, "bogus");
    assert_eq!(err.to_string(), "unknown category 'bogus'");
    assert!(CategorySet::parse_list("bogus").is_err());
}

#[test]
fn flag_builder_deduplicates_relations() {
    let flag = Flag::new("NONLIN_FRSURF", Category::Formulation)
        .requires(["EXACT_CONSERV", "EXACT_CONSERV"])
        .excludes(["A", "B", "A"]);

    assert!(!flag.default);
    assert_eq!(flag.requires, vec!["EXACT_CONSERV".to_owned()]);
    assert_eq!(flag.excludes, vec!["A".to_owned(), "B".to_owned()]);
}

#[test]
fn flag_deserializes_with_defaults() {
    let flag: Flag = serde_json::from_value(json!({
        "name": "SHORTWAVE_HEATING",
        "category": "forcing",
        "default": true
    }))
    .expect("flag deserialize");

    assert_eq!(flag, Flag::new("SHORTWAVE_HEATING", Category::Forcing).enabled_by_default());
}

#[test]
fn flag_rejects_unknown_fields() {
    let result: Result<Flag, _> = serde_json::from_value(json!({
        "name": "X",
        "category": "forcing",
        "enabled": true
    }));
    assert!(result.is_err());
}

#[test]
fn source_keeps_assertion_order() {
    let source = ConfigSource::new("exp").define("A").undef("B").define("A");
    let names: Vec<_> = source.iter().map(|a| (a.name.as_str(), a.enabled)).collect();
    assert_eq!(names, vec![("A", true), ("B", false), ("A", true)]);
    assert_eq!(source.label(), "exp");
    assert_eq!(source.len(), 3);
}
