//! i18n-convert - replace hard-coded Chinese text with translation calls
//!
//! Looks up display text in an existing key -> text dictionary and rewrites
//! Vue templates and JavaScript/TypeScript code so the text is fetched through
//! `$t('key')` / `i18n.t('key')` instead.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Conversion engine (text classifier, dictionary index, rewriters)

pub mod cli;
pub mod config;
pub mod core;
