//! The field/record data model.
//!
//! A [`Record`] is an immutable, ordered, fixed-size sequence of [`Field`]s
//! plus an optional category label and an optional record id. Field indices
//! within a record are always exactly `0..size` in order. "Mutating" a record
//! always produces a new `Record` instance; no method mutates state after
//! construction.
//!
//! The set of record shapes is deliberately closed: the constructors
//! ([`Record::empty`], [`Record::of_value`], [`Record::of_two`],
//! [`Record::key_value`], [`Record::key_value_comment`],
//! [`Record::from_texts`]) cover every shape the formats produce, and the
//! conversion mappers in [`crate::mapper`] project between them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Index of the first field of every non-empty record.
pub const FIRST_FIELD_INDEX: usize = 0;
/// Index of the key field in key/value shaped records.
pub const KEY_INDEX: usize = 0;
/// Index of the value field in key/value shaped records.
pub const VALUE_INDEX: usize = 1;
/// Index of the comment field in key/value/comment shaped records.
pub const COMMENT_INDEX: usize = 2;

/// One positioned, possibly-null text value within a [`Record`].
///
/// Equality and hashing are structural over `(index, max_index, text)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    index: usize,
    max_index: usize,
    text: Option<String>,
}

impl Field {
    /// Creates a field, validating `index <= max_index`.
    pub fn new(index: usize, max_index: usize, text: Option<String>) -> Result<Field> {
        if index > max_index {
            return Err(Error::Config(format!(
                "illegal field index: index={index} max_index={max_index}"
            )));
        }
        Ok(Field {
            index,
            max_index,
            text,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// The text of this field, or `None` for a null value.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The text of this field, or `default` for a null value.
    pub fn text_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.text.as_deref().unwrap_or(default)
    }

    pub fn is_first(&self) -> bool {
        self.index == FIRST_FIELD_INDEX
    }

    pub fn is_last(&self) -> bool {
        self.index == self.max_index
    }

    pub fn is_null(&self) -> bool {
        self.text.is_none()
    }

    /// `true` for a non-null but empty text.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref() == Some("")
    }

    pub fn is_null_or_empty(&self) -> bool {
        self.text.as_deref().is_none_or(str::is_empty)
    }

    /// The length of the text, or `0` for a null value.
    pub fn length(&self) -> usize {
        self.text.as_deref().map_or(0, str::len)
    }
}

/// An ordered, fixed-size collection of [`Field`]s plus an optional category
/// and an optional record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    category: Option<String>,
    record_id: Option<u64>,
    fields: Vec<Field>,
}

impl Record {
    /// A record with no fields, no category and no record id.
    pub fn empty() -> Record {
        Record {
            category: None,
            record_id: None,
            fields: Vec::new(),
        }
    }

    /// A record with exactly one value field.
    pub fn of_value(
        category: Option<String>,
        record_id: Option<u64>,
        value: Option<String>,
    ) -> Record {
        Record::build(category, record_id, vec![value])
    }

    /// A record with exactly two value fields.
    pub fn of_two(
        category: Option<String>,
        record_id: Option<u64>,
        first: Option<String>,
        second: Option<String>,
    ) -> Record {
        Record::build(category, record_id, vec![first, second])
    }

    /// A key/value record. The key field is never null.
    pub fn key_value(
        category: Option<String>,
        record_id: Option<u64>,
        key: String,
        value: Option<String>,
    ) -> Record {
        Record::build(category, record_id, vec![Some(key), value])
    }

    /// A key/value/comment record. The key field is never null.
    pub fn key_value_comment(
        category: Option<String>,
        record_id: Option<u64>,
        key: String,
        value: Option<String>,
        comment: Option<String>,
    ) -> Record {
        Record::build(category, record_id, vec![Some(key), value, comment])
    }

    /// A record with an arbitrary number of fields.
    pub fn from_texts<I>(category: Option<String>, record_id: Option<u64>, texts: I) -> Record
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Record::build(category, record_id, texts.into_iter().collect())
    }

    fn build(
        category: Option<String>,
        record_id: Option<u64>,
        texts: Vec<Option<String>>,
    ) -> Record {
        let max_index = texts.len().saturating_sub(1);
        let fields = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Field {
                index,
                max_index,
                text,
            })
            .collect();
        Record {
            category,
            record_id,
            fields,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn has_category(&self) -> bool {
        self.category.is_some()
    }

    pub fn record_id(&self) -> Option<u64> {
        self.record_id
    }

    /// Number of contained fields.
    pub fn size(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.fields.len()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field at `index`, or [`Error::IndexOutOfRange`].
    ///
    /// Out-of-range access is an error by design; it is never conflated with
    /// a field whose text is null.
    pub fn field_at(&self, index: usize) -> Result<&Field> {
        self.fields.get(index).ok_or(Error::IndexOutOfRange {
            index,
            size: self.fields.len(),
        })
    }

    pub fn first_field(&self) -> Option<&Field> {
        self.fields.first()
    }

    pub fn last_field(&self) -> Option<&Field> {
        self.fields.last()
    }

    /// The text at `index`; `Ok(None)` for a present-but-null field,
    /// [`Error::IndexOutOfRange`] for a missing one.
    pub fn text_at(&self, index: usize) -> Result<Option<&str>> {
        self.field_at(index).map(Field::text)
    }

    /// The text at `index`, substituting `default` when the field is missing
    /// or its text is null.
    pub fn text_at_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.fields
            .get(index)
            .and_then(Field::text)
            .unwrap_or(default)
    }

    /// The key of a key/value shaped record: the text at [`KEY_INDEX`] when
    /// it is non-null.
    pub fn key(&self) -> Option<&str> {
        self.fields.get(KEY_INDEX).and_then(Field::text)
    }

    /// The designated value of this record: the text of the last field.
    pub fn value(&self) -> Option<&str> {
        self.fields.last().and_then(Field::text)
    }

    /// The value of a key/value shaped record: the text at [`VALUE_INDEX`].
    pub fn value_of_value_field(&self) -> Option<&str> {
        self.fields.get(VALUE_INDEX).and_then(Field::text)
    }

    /// The comment of a key/value/comment shaped record.
    pub fn comment(&self) -> Option<&str> {
        self.fields.get(COMMENT_INDEX).and_then(Field::text)
    }

    /// A copy of this record with a different category.
    pub fn with_category(&self, category: Option<String>) -> Record {
        let mut record = self.clone();
        record.category = category;
        record
    }

    /// A copy of this record with a different record id.
    pub fn with_record_id(&self, record_id: Option<u64>) -> Record {
        let mut record = self.clone();
        record.record_id = record_id;
        record
    }

    /// A copy of this record with the field text at `index` replaced. A copy
    /// of the unchanged record is returned when `index` is out of range.
    pub fn with_text_at(&self, index: usize, text: Option<String>) -> Record {
        let mut record = self.clone();
        if let Some(field) = record.fields.get_mut(index) {
            field.text = text;
        }
        record
    }

    /// The texts of all fields in order.
    pub fn texts(&self) -> Vec<Option<&str>> {
        self.fields.iter().map(Field::text).collect()
    }
}
