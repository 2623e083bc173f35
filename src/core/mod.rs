//! Conversion engine.
//!
//! - `text`: classification and normalization of candidate text
//! - `dictionary`: reverse index from text to keys
//! - `context`: resolution options and the unmatched accumulator
//! - `segment`: the transform unit shared by both rewriters
//! - `markup`: pattern-based template rewriter
//! - `script`: syntax-tree code rewriter
//! - `source`, `converter`: per-file splitting and pipeline
//! - `parsers`, `file_scanner`, `unmatched_log`: host I/O

pub mod context;
pub mod converter;
pub mod dictionary;
pub mod edit;
pub mod file_scanner;
pub mod markup;
pub mod parsers;
pub mod script;
pub mod segment;
pub mod source;
pub mod text;
pub mod unmatched_log;

pub use context::{ConversionContext, ResolutionOptions, UnmatchedSet};
pub use converter::{ConvertOptions, Converter, FileOutcome, RegionFailure};
pub use dictionary::{DictionaryIndex, KeyGroup, Lookup};
pub use markup::convert_markup_region;
pub use script::{CodeOptions, ScriptError, ScriptLang, convert_code_region};
