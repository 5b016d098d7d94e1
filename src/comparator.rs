//! Comparator builders for fields and records.
//!
//! Every builder returns a plain closure, so comparators compose with
//! [`then_by`] and can be handed to [`crate::modifier::SortModifier`]
//! directly. Nullable projections (category, record id, field texts) always
//! take an explicit [`SortNulls`] policy; null placement is never implicit.
//!
//! Null placement and the null-replacement markers used by the format
//! consumers are two independent policies. Configuring one says nothing
//! about the other.

use crate::record::{Field, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Where null values sort relative to non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortNulls {
    First,
    Last,
}

impl SortNulls {
    /// Compares two optional values, placing `None` per this policy and
    /// delegating to `cmp` when both are present.
    pub fn compare<T: ?Sized>(
        self,
        a: Option<&T>,
        b: Option<&T>,
        cmp: impl Fn(&T, &T) -> Ordering,
    ) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => match self {
                SortNulls::First => Ordering::Less,
                SortNulls::Last => Ordering::Greater,
            },
            (Some(_), None) => match self {
                SortNulls::First => Ordering::Greater,
                SortNulls::Last => Ordering::Less,
            },
            (Some(a), Some(b)) => cmp(a, b),
        }
    }
}

/// Natural (lexicographic, case-sensitive) string ordering.
pub fn natural_order() -> impl Fn(&str, &str) -> Ordering + Clone {
    |a: &str, b: &str| a.cmp(b)
}

/// Case-insensitive string ordering over Unicode lowercase folding.
pub fn case_insensitive() -> impl Fn(&str, &str) -> Ordering + Clone {
    |a: &str, b: &str| a.to_lowercase().cmp(&b.to_lowercase())
}

/// Orders strings by length, shorter first.
pub fn by_length() -> impl Fn(&str, &str) -> Ordering + Clone {
    |a: &str, b: &str| a.len().cmp(&b.len())
}

/// Orders fields by their index.
pub fn field_index() -> impl Fn(&Field, &Field) -> Ordering {
    |a, b| a.index().cmp(&b.index())
}

/// Orders fields by their text with an explicit null placement.
pub fn field_text(
    cmp: impl Fn(&str, &str) -> Ordering,
    nulls: SortNulls,
) -> impl Fn(&Field, &Field) -> Ordering {
    move |a, b| nulls.compare(a.text(), b.text(), &cmp)
}

/// Orders records by category with an explicit null placement.
pub fn category(
    cmp: impl Fn(&str, &str) -> Ordering,
    nulls: SortNulls,
) -> impl Fn(&Record, &Record) -> Ordering {
    move |a, b| nulls.compare(a.category(), b.category(), &cmp)
}

/// Orders records by record id with an explicit null placement.
pub fn record_id(nulls: SortNulls) -> impl Fn(&Record, &Record) -> Ordering {
    move |a, b| {
        nulls.compare(
            a.record_id().as_ref(),
            b.record_id().as_ref(),
            |x: &u64, y: &u64| x.cmp(y),
        )
    }
}

/// Orders records by their number of fields.
pub fn size() -> impl Fn(&Record, &Record) -> Ordering {
    |a, b| a.size().cmp(&b.size())
}

/// Orders records by the text at `index`. A missing field compares like a
/// null text under the given placement.
pub fn text_at(
    index: usize,
    cmp: impl Fn(&str, &str) -> Ordering,
    nulls: SortNulls,
) -> impl Fn(&Record, &Record) -> Ordering {
    move |a, b| {
        let ta = a.text_at(index).ok().flatten();
        let tb = b.text_at(index).ok().flatten();
        nulls.compare(ta, tb, &cmp)
    }
}

/// Orders key/value shaped records by key. Records without a key (no field
/// at the key index, or a null text there) sort first.
pub fn key(cmp: impl Fn(&str, &str) -> Ordering) -> impl Fn(&Record, &Record) -> Ordering {
    move |a, b| SortNulls::First.compare(a.key(), b.key(), &cmp)
}

/// Chains two comparators: `second` breaks ties of `first`.
pub fn then_by<T: ?Sized>(
    first: impl Fn(&T, &T) -> Ordering,
    second: impl Fn(&T, &T) -> Ordering,
) -> impl Fn(&T, &T) -> Ordering {
    move |a, b| first(a, b).then_with(|| second(a, b))
}
