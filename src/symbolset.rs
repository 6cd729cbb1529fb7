//! Symbol sets and the conversion between a symbol set and IPA.
//!
//! A symbol set lists the legal symbols of one transcription convention
//! (a SAMPA variant, the CMU phone set, IPA itself) with their category and
//! their canonical IPA form. Everything else in the crate goes through IPA:
//! [`SymbolSet::convert_to_ipa`] and [`SymbolSet::convert_from_ipa`] are the
//! two halves that [`crate::mapper::Mapper`] composes.
//!
//! Modules, leaves first:
//!
//! - [`symbol`]: symbols, categories and the set kind
//! - [`matchers`]: regex alternations per symbol subset
//! - [`tokenizer`]: delimited and longest-match splitting
//! - [`filters`]: stress and tone accent placement rewrites
//! - [`catalog`]: the validated [`SymbolSet`]
//! - [`selftest`]: embedded `TEST` lines
//! - [`loader`]: `.sym` definition files

pub mod catalog;
pub mod filters;
pub mod loader;
pub mod matchers;
pub mod selftest;
pub mod symbol;
pub mod tokenizer;

pub use catalog::SymbolSet;
pub use loader::{
    load_symbol_set, load_symbol_set_with_name, load_symbol_sets_from_dir, parse_symbol_set,
};
pub use matchers::Subset;
pub use symbol::{Category, IpaSymbol, Kind, Symbol};
