//! File parsers for dictionary files.

pub mod dictionary;
