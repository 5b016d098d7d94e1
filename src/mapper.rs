//! Mapper builders: pure `Fn(&Record) -> Record` transformations.
//!
//! Mappers are side-effect-free and safe to apply to the same input any
//! number of times with identical results. They compose via [`chain`] and
//! branch via [`conditional`]. The `to_*` conversions project a generic
//! record into one of the narrower shapes, substituting a caller-supplied
//! default when a required field is textually absent.

use crate::record::Record;

/// Returns the input record unchanged.
pub fn identity() -> impl Fn(&Record) -> Record {
    |r| r.clone()
}

/// Maps every record to a copy of `record`.
pub fn constant(record: Record) -> impl Fn(&Record) -> Record {
    move |_| record.clone()
}

/// Branches on `condition`: matching records go through `then_mapper`, all
/// others through `else_mapper`.
pub fn conditional(
    condition: impl Fn(&Record) -> bool,
    then_mapper: impl Fn(&Record) -> Record,
    else_mapper: impl Fn(&Record) -> Record,
) -> impl Fn(&Record) -> Record {
    move |r| {
        if condition(r) {
            then_mapper(r)
        } else {
            else_mapper(r)
        }
    }
}

/// Applies `first`, then `second`.
pub fn chain(
    first: impl Fn(&Record) -> Record,
    second: impl Fn(&Record) -> Record,
) -> impl Fn(&Record) -> Record {
    move |r| second(&first(r))
}

/// Lifts a text function to operate on the field at `index`, leaving all
/// other fields untouched. Records without a field at `index` pass through
/// unchanged.
pub fn map_text_at(
    index: usize,
    f: impl Fn(Option<&str>) -> Option<String>,
) -> impl Fn(&Record) -> Record {
    move |r| match r.text_at(index) {
        Ok(original) => r.with_text_at(index, f(original)),
        Err(_) => r.clone(),
    }
}

/// Rewrites the category.
pub fn map_category(
    f: impl Fn(Option<&str>) -> Option<String>,
) -> impl Fn(&Record) -> Record {
    move |r| r.with_category(f(r.category()))
}

/// Rewrites the record id.
pub fn map_record_id(
    f: impl Fn(Option<u64>) -> Option<u64>,
) -> impl Fn(&Record) -> Record {
    move |r| r.with_record_id(f(r.record_id()))
}

/// Projects the fields at `key_index` and `value_index` into a key/value
/// record. `null_key` substitutes for a missing or null key text.
pub fn to_key_value(
    key_index: usize,
    value_index: usize,
    null_key: String,
) -> impl Fn(&Record) -> Record {
    move |r| {
        Record::key_value(
            r.category().map(str::to_owned),
            r.record_id(),
            r.text_at_or(key_index, &null_key).to_owned(),
            r.text_at(value_index).ok().flatten().map(str::to_owned),
        )
    }
}

/// Projects the field at `value_index` into a one-value record. A missing
/// field becomes a null value.
pub fn to_one_value(value_index: usize) -> impl Fn(&Record) -> Record {
    move |r| {
        Record::of_value(
            r.category().map(str::to_owned),
            r.record_id(),
            r.text_at(value_index).ok().flatten().map(str::to_owned),
        )
    }
}

/// Projects three fields into a key/value/comment record. `null_key`
/// substitutes for a missing or null key text.
pub fn to_key_value_comment(
    key_index: usize,
    value_index: usize,
    comment_index: usize,
    null_key: String,
) -> impl Fn(&Record) -> Record {
    move |r| {
        Record::key_value_comment(
            r.category().map(str::to_owned),
            r.record_id(),
            r.text_at_or(key_index, &null_key).to_owned(),
            r.text_at(value_index).ok().flatten().map(str::to_owned),
            r.text_at(comment_index).ok().flatten().map(str::to_owned),
        )
    }
}
