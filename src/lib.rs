//! # Textflow
//!
//! A **record-oriented text processing** library for Rust. Textflow models
//! flat text data as immutable records of indexed, possibly-null fields and
//! provides composable comparators, filters, mappers and stream modifiers,
//! plus lifecycle-checked producers and consumers for a family of
//! line-oriented file formats.
//!
//! ## Key Features
//!
//! - **Immutable record model** - ordered fields with explicit null texts,
//!   an optional category and an optional record id
//! - **Composable operations** - comparators, filters and mappers built from
//!   plain closures, combined with `and`/`or`/`not`, `then_by` and `chain`
//! - **Stream modifiers** - identity, map, filter, sort, distinct and
//!   sequences thereof over lazy, fallible record streams
//! - **Lifecycle-checked I/O** - producers and consumers enforce their
//!   `before → records → after → close` protocol at runtime
//! - **File formats** - single-value, config, delimited, fixed-width,
//!   properties, markdown and HTML table (optional via feature flags)
//! - **Close discipline** - sources and sinks are always closed, and a close
//!   failure following a primary failure is attached as suppressed
//!
//! ## Quick Start
//!
//! ```ignore
//! use textflow::*;
//! use textflow::io::config::ConfigFileSpec;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let spec = ConfigFileSpec::default();
//!
//! let mut producer = spec.producer(CharsetCoding::Strict.open_reader("app.cfg")?);
//! let mut consumer = spec.consumer(create_writer("normalized.cfg")?);
//!
//! // Normalize: map categories, sort, drop duplicate keys
//! let normalizer = ConfigNormalizer::new(KEY_INDEX, VALUE_INDEX, true);
//! transfer_modified(&mut producer, &normalizer, &mut consumer)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Record
//!
//! A [`Record`] is an immutable, fixed-size sequence of [`Field`]s. Every
//! field is addressed by its index `0..size` and carries a possibly-null
//! text; a null text and an out-of-range index are never conflated. Records
//! come in a closed set of shapes (empty, single value, key/value, ...) and
//! "mutation" always produces a new record.
//!
//! ### Operations
//!
//! Three families of plain functions operate on records:
//! - [`comparator`] - total orders over records with explicit
//!   [`SortNulls`] placement for missing values
//! - [`filter`] - predicates over records; out-of-range field access is
//!   simply `false`, never a panic
//! - [`mapper`] - record-to-record transformations, including shape
//!   conversions such as [`mapper::to_key_value`]
//!
//! ### Streams and Modifiers
//!
//! A [`RecordStream`] is a lazy, fallible iterator of records. A
//! [`RecordStreamModifier`] rewrites one stream into another: [`MapModifier`],
//! [`FilterModifier`], [`SortModifier`], [`DistinctModifier`] and
//! [`SequenceModifier`] cover the usual pipeline stages, and
//! [`ConfigNormalizer`] packages the map-sort-distinct sequence used for
//! config files.
//!
//! ### Producers and Consumers
//!
//! A [`ReadableRecordProducer`] reads records from a character source via
//! `read_before → read_records → read_after → close`; a
//! [`WritableRecordConsumer`] writes them via the mirrored lifecycle.
//! Out-of-order calls fail with [`Error::IllegalState`]. The [`read_all`],
//! [`write_all`] and [`transfer`] drivers run full lifecycles with the close
//! discipline handled for you.
//!
//! ## File Formats
//!
//! Each format lives in its own [`io`] submodule behind a `FileSpec` type
//! that validates its configuration and hands out producers and consumers:
//!
//! - [`io::single_value`] - one field text per line
//! - [`io::config`] - `key=value` lines grouped under `[category]` markers
//! - [`io::delimited`] (feature `format-delimited`) - delimiter-separated
//!   fields without quoting
//! - [`io::fixed_width`] (feature `format-fixed-width`) - fields at fixed
//!   character positions
//! - [`io::properties`] (feature `format-properties`) - Java-style
//!   `key=value` with escape sequences
//! - [`io::markdown`] (feature `format-markdown`) - markdown tables and
//!   lists, write-only
//! - [`io::html_table`] (feature `format-html`) - HTML tables, write-only
//!
//! ## Feature Flags
//!
//! - `format-delimited` - simple delimiter-separated files
//! - `format-fixed-width` - fixed-width files
//! - `format-properties` - properties files
//! - `format-markdown` - markdown table and list output
//! - `format-html` - HTML table output
//!
//! All format features are enabled by default; the single-value and config
//! formats are always available.
//!
//! ## Module Overview
//!
//! - [`record`] - the field/record data model
//! - [`comparator`] - record orderings and null placement
//! - [`filter`] - record predicates
//! - [`mapper`] - record transformations and shape conversions
//! - [`modifier`] - lazy stream rewrites (map, filter, sort, distinct)
//! - [`producer`] - in-memory record producers
//! - [`consumer`] - in-memory record consumers
//! - [`io`] - file-backed producers, consumers and format specs
//! - [`error`] - the error taxonomy shared by all of the above

pub mod comparator;
pub mod consumer;
pub mod error;
pub mod filter;
pub mod io;
pub mod mapper;
pub mod modifier;
pub mod producer;
pub mod record;

// General re-exports
pub use comparator::SortNulls;
pub use consumer::{MapConsumer, RecordConsumer, StringConsumer, VecConsumer};
pub use error::{Error, Result};
pub use io::combined::{CombinedReadableRecordProducer, CombinedWritableRecordConsumer};
pub use io::consumer::{ConsumerState, LineRecordConsumer, RecordFormatter, WritableRecordConsumer};
pub use io::producer::{
    LineRecordProducer, ProducerState, RawData, RawDataParser, ReadableRecordProducer,
};
pub use io::{
    Alignment, CharsetCoding, LineSeparator, create_writer, read_all, transfer,
    transfer_modified, write_all,
};
pub use modifier::{
    ConfigNormalizer, DistinctModifier, FilterModifier, IdentityModifier, MapModifier,
    RecordStream, RecordStreamModifier, SequenceModifier, SortModifier,
};
pub use producer::{ConstantProducer, RecordProducer, VecProducer};
pub use record::{COMMENT_INDEX, FIRST_FIELD_INDEX, Field, KEY_INDEX, Record, VALUE_INDEX};

// Gated re-exports
#[cfg(feature = "format-delimited")]
pub use io::delimited::SimpleDelimitedFileSpec;

#[cfg(feature = "format-fixed-width")]
pub use io::fixed_width::{FixedWidthFieldSpec, FixedWidthFileSpec};

#[cfg(feature = "format-properties")]
pub use io::properties::PropertiesFileSpec;

#[cfg(feature = "format-markdown")]
pub use io::markdown::{
    BulletPoint, MarkdownListFileSpec, MarkdownTableFieldSpec, MarkdownTableFileSpec,
};

#[cfg(feature = "format-html")]
pub use io::html_table::{HtmlTableFieldSpec, HtmlTableFileSpec};
