//! String pattern, case and format rules.

mod common;

use common::accepts;
use conform::prelude::*;
use regex::Regex;

#[test]
fn test_matches() {
    let schema = string().matches(Regex::new("^[0-9]+$").unwrap());
    assert!(accepts("30485", schema.clone()));
    assert!(!accepts("304a85", schema));
}

#[test]
fn test_regex_shorthand() {
    let schema = Regex::new("^[a-z]+$").unwrap();
    assert!(accepts("abc", schema.clone()));
    assert!(!accepts("abc1", schema.clone()));
    assert!(!accepts(7, schema));
}

#[test]
fn test_case_rules() {
    assert!(accepts("abcdef", string().lowercase()));
    assert!(!accepts("abcDef", string().lowercase()));
    assert!(accepts("ABCDEF", string().uppercase()));
    assert!(!accepts("abcDef", string().uppercase()));
}

#[test]
fn test_url() {
    assert!(accepts("http://localhost/", string().url()));
    assert!(accepts("https://user:pw@example.com:8080/x", string().url()));
    assert!(!accepts("www.localhost.com", string().url()));
}

#[test]
fn test_alphanum_digits_numeric() {
    assert!(accepts("abc123", string().alphanum()));
    assert!(!accepts("abc 123", string().alphanum()));
    assert!(accepts("0123", string().digits()));
    assert!(!accepts("-1", string().digits()));
    assert!(accepts("-1.5e3", string().numeric()));
    assert!(!accepts("1.5x", string().numeric()));
}

#[test]
fn test_length_rules_count_characters() {
    assert!(accepts("äöü", string().length(3)));
    assert!(accepts("ab", string().min_length(2).max_length(2)));
    assert!(!accepts("abc", string().max_length(2)));
}
