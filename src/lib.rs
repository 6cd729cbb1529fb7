//! # phonomap
//!
//! Conversion between phonetic transcription symbol sets.
//!
//! Every symbol set defines how its symbols are written in IPA, so any two
//! sets can be mapped through IPA ([`Mapper`]). Where languages differ, a
//! rule based [`Converter`] rewrites one language's transcription into
//! another's.
//!
//! - [`symbolset`]: symbol sets, tokenization and IPA conversion
//! - [`mapper`]: set to set mapping through IPA
//! - [`converter`]: ordered rewrite rules between languages
//! - [`service`]: a registry of loaded sets, mappers and converters
//!
//! ```text
//! let sv = load_symbol_set("sv-se_ws-sampa.sym")?;
//! sv.convert_to_ipa("\" b O rt")?;   // "ˈbɔʈ"
//! ```

pub mod converter;
pub mod error;
pub mod mapper;
pub mod service;
pub mod symbolset;

pub use converter::Converter;
pub use error::{Error, ErrorReport, Result};
pub use mapper::Mapper;
pub use service::{Registry, SharedRegistry};
pub use symbolset::SymbolSet;
