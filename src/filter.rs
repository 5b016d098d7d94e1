//! Predicate builders for records.
//!
//! Every builder returns a total, side-effect-free `Fn(&Record) -> bool`;
//! repeated evaluation on the same input always yields the same result.
//! Predicates over a field index evaluate to `false` when the record has no
//! field at that index — record sizes are unknown at construction time, so
//! the out-of-range case is a defined evaluation-time outcome rather than a
//! construction-time error.

use crate::record::Record;
use regex::Regex;

pub fn has_category() -> impl Fn(&Record) -> bool {
    |r| r.has_category()
}

pub fn category_is(category: Option<String>) -> impl Fn(&Record) -> bool {
    move |r| r.category() == category.as_deref()
}

pub fn record_id_is(record_id: u64) -> impl Fn(&Record) -> bool {
    move |r| r.record_id() == Some(record_id)
}

pub fn size_is(size: usize) -> impl Fn(&Record) -> bool {
    move |r| r.size() == size
}

pub fn is_not_empty() -> impl Fn(&Record) -> bool {
    |r| !r.is_empty()
}

/// `true` when the record has a field at `index` with a non-null text.
pub fn has_text_at(index: usize) -> impl Fn(&Record) -> bool {
    move |r| matches!(r.text_at(index), Ok(Some(_)))
}

/// `true` when the text at `index` equals `text`. Out-of-range evaluates to
/// `false`; a null text only matches `None`.
pub fn text_at_is(index: usize, text: Option<String>) -> impl Fn(&Record) -> bool {
    move |r| match r.text_at(index) {
        Ok(t) => t == text.as_deref(),
        Err(_) => false,
    }
}

/// `true` when the text at `index` is non-null and matches `pattern`.
pub fn text_at_matches(index: usize, pattern: Regex) -> impl Fn(&Record) -> bool {
    move |r| match r.text_at(index) {
        Ok(Some(t)) => pattern.is_match(t),
        _ => false,
    }
}

pub fn and(
    first: impl Fn(&Record) -> bool,
    second: impl Fn(&Record) -> bool,
) -> impl Fn(&Record) -> bool {
    move |r| first(r) && second(r)
}

pub fn or(
    first: impl Fn(&Record) -> bool,
    second: impl Fn(&Record) -> bool,
) -> impl Fn(&Record) -> bool {
    move |r| first(r) || second(r)
}

pub fn not(filter: impl Fn(&Record) -> bool) -> impl Fn(&Record) -> bool {
    move |r| !filter(r)
}
