//! Whole-stream modifiers.
//!
//! A [`RecordStreamModifier`] transforms an entire lazy record sequence
//! rather than a single record. [`MapModifier`] and [`FilterModifier`] stay
//! lazy and element-wise. [`SortModifier`] necessarily materializes the
//! whole input before yielding anything — it breaks the lazy, single-pass
//! contract of the rest of the pipeline and buffers every record.
//! [`DistinctModifier`] stays lazy but keeps one projection string per
//! distinct key, so its memory grows with the distinct key count.
//!
//! Modifiers compose with [`RecordStreamModifier::and_then`], which is how
//! the format-level [`ConfigNormalizer`] assembles its map → sort →
//! optional-distinct pipeline.

use crate::comparator::{self, SortNulls};
use crate::error::Result;
use crate::mapper;
use crate::record::Record;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// A lazy, forward-only, single-pass sequence of records. Failures crossing
/// the stream boundary travel as `Err` elements.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

/// A transformation over a whole record sequence.
pub trait RecordStreamModifier {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a>;

    /// Sequences `self` before `next`.
    fn and_then<M>(self, next: M) -> SequenceModifier<Self, M>
    where
        Self: Sized,
        M: RecordStreamModifier,
    {
        SequenceModifier {
            first: self,
            second: next,
        }
    }
}

impl RecordStreamModifier for Box<dyn RecordStreamModifier> {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        (**self).modify(stream)
    }
}

/// Passes the stream through unchanged.
pub struct IdentityModifier;

impl RecordStreamModifier for IdentityModifier {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        stream
    }
}

/// Applies a mapper to every record.
pub struct MapModifier {
    mapper: Arc<dyn Fn(&Record) -> Record>,
}

impl MapModifier {
    pub fn new(mapper: impl Fn(&Record) -> Record + 'static) -> MapModifier {
        MapModifier {
            mapper: Arc::new(mapper),
        }
    }
}

impl RecordStreamModifier for MapModifier {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        let mapper = Arc::clone(&self.mapper);
        Box::new(stream.map(move |item| item.map(|r| mapper(&r))))
    }
}

/// Keeps the records matching a predicate. Failures always pass through.
pub struct FilterModifier {
    filter: Arc<dyn Fn(&Record) -> bool>,
}

impl FilterModifier {
    pub fn new(filter: impl Fn(&Record) -> bool + 'static) -> FilterModifier {
        FilterModifier {
            filter: Arc::new(filter),
        }
    }
}

impl RecordStreamModifier for FilterModifier {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        let filter = Arc::clone(&self.filter);
        Box::new(stream.filter(move |item| match item {
            Ok(r) => filter(r),
            Err(_) => true,
        }))
    }
}

/// Stable sort by a supplied comparator.
///
/// Sorting is eager: the entire input is buffered when `modify` runs. The
/// first failure in the input becomes the sole output element.
pub struct SortModifier {
    comparator: Arc<dyn Fn(&Record, &Record) -> Ordering>,
}

impl SortModifier {
    pub fn new(comparator: impl Fn(&Record, &Record) -> Ordering + 'static) -> SortModifier {
        SortModifier {
            comparator: Arc::new(comparator),
        }
    }
}

impl RecordStreamModifier for SortModifier {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        let mut buffered = Vec::new();
        for item in stream {
            match item {
                Ok(record) => buffered.push(record),
                Err(e) => return Box::new(std::iter::once(Err(e))),
            }
        }
        let comparator = Arc::clone(&self.comparator);
        buffered.sort_by(|a, b| comparator(a, b));
        Box::new(buffered.into_iter().map(Ok))
    }
}

/// Removes records whose key projection has been seen before, preserving
/// first-occurrence order. Memory grows with the distinct key count.
pub struct DistinctModifier {
    key_of: Arc<dyn Fn(&Record) -> String>,
}

impl DistinctModifier {
    pub fn new(key_of: impl Fn(&Record) -> String + 'static) -> DistinctModifier {
        DistinctModifier {
            key_of: Arc::new(key_of),
        }
    }
}

impl RecordStreamModifier for DistinctModifier {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        let key_of = Arc::clone(&self.key_of);
        let mut seen = HashSet::new();
        Box::new(stream.filter(move |item| match item {
            Ok(r) => seen.insert(key_of(r)),
            Err(_) => true,
        }))
    }
}

/// Two modifiers applied in sequence.
pub struct SequenceModifier<A, B> {
    first: A,
    second: B,
}

impl<A, B> RecordStreamModifier for SequenceModifier<A, B>
where
    A: RecordStreamModifier,
    B: RecordStreamModifier,
{
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        self.second.modify(self.first.modify(stream))
    }
}

/// Normalizes an arbitrary record stream into sorted key/value records for
/// the config format: project key/value fields with a trimmed, upper-cased
/// category, sort by category (nulls first) then key, and optionally drop
/// duplicate (category, key) pairs keeping the first occurrence.
pub struct ConfigNormalizer {
    modifier: Box<dyn RecordStreamModifier>,
}

impl ConfigNormalizer {
    pub fn new(key_index: usize, value_index: usize, remove_duplicates: bool) -> ConfigNormalizer {
        let map = MapModifier::new(mapper::chain(
            mapper::map_category(normalize_category),
            mapper::to_key_value(key_index, value_index, String::new()),
        ));
        let sort = SortModifier::new(comparator::then_by(
            comparator::category(comparator::natural_order(), SortNulls::First),
            comparator::key(comparator::natural_order()),
        ));
        let modifier: Box<dyn RecordStreamModifier> = if remove_duplicates {
            let distinct = DistinctModifier::new(|r: &Record| {
                format!("{:?}\u{1f}{:?}", r.category(), r.key())
            });
            Box::new(map.and_then(sort).and_then(distinct))
        } else {
            Box::new(map.and_then(sort))
        };
        ConfigNormalizer { modifier }
    }
}

impl RecordStreamModifier for ConfigNormalizer {
    fn modify<'a>(&self, stream: RecordStream<'a>) -> RecordStream<'a> {
        self.modifier.modify(stream)
    }
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
}
