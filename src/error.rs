//! Error types shared by symbol sets, mappers, converters and the registry.
//!
//! Construction-time checks (symbol sets, mappers, converters) aggregate every
//! problem they find into one error so a broken definition can be fixed in a
//! single pass. Runtime conversions aggregate unknown symbols and otherwise stop
//! at the first structural failure.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The two halves of a mapper run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapStage {
    /// Source symbol set into canonical IPA
    ToIpa,
    /// Canonical IPA into the target symbol set
    FromIpa,
}

impl fmt::Display for MapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapStage::ToIpa => write!(f, "to ipa"),
            MapStage::FromIpa => write!(f, "from ipa"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// One or more input substrings could not be resolved against a symbol set
    #[error("unknown input symbol(s): {}", .0.join(", "))]
    UnknownInputSymbol(Vec<String>),

    /// A produced transcription contains symbols absent from the target set
    #[error("invalid symbol(s) in output transcription /{output}/: {}", .symbols.join(", "))]
    InvalidOutputSymbol {
        output: String,
        symbols: Vec<String>,
    },

    /// Structural parse failure in a definition file or test line
    #[error("malformed definition {source_name}: {}", .problems.join("; "))]
    MalformedDefinition {
        source_name: String,
        problems: Vec<String>,
    },

    /// A symbol set violates one of its construction invariants
    #[error("invalid symbol set {name}: {}", .problems.join("; "))]
    InvalidSymbolSet { name: String, problems: Vec<String> },

    /// Embedded or example tests failed while building a structure
    #[error("self test failed for {name}: {}", .failures.join("; "))]
    SelfTestFailure { name: String, failures: Vec<String> },

    /// The delimiter-free splitter was handed a set with a non-empty phoneme delimiter
    #[error("longest-match splitting requires an empty phoneme delimiter; found /{0}/")]
    DelimiterMismatch(String),

    /// A pattern failed to compile or to match
    #[error("pattern '{pattern}' failed: {message}")]
    Pattern { pattern: String, message: String },

    /// A mapper stage failed; the inner error is kept as is
    #[error("couldn't map transcription ({stage}): {source}")]
    Mapping {
        stage: MapStage,
        #[source]
        source: Box<Error>,
    },

    #[error("no such symbol set: {0}")]
    UnknownSymbolSet(String),

    #[error("no such converter: {0}")]
    UnknownConverter(String),

    /// Some definition files in a directory failed to load
    #[error("couldn't load {} definition(s) from {}: {}", .failures.len(), .path.display(), .failures.join("; "))]
    Load {
        path: PathBuf,
        failures: Vec<String>,
    },

    #[error("couldn't read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn pattern(pattern: &str, err: impl std::fmt::Display) -> Self {
        Error::Pattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(source_name: impl Into<String>, problem: impl Into<String>) -> Self {
        Error::MalformedDefinition {
            source_name: source_name.into(),
            problems: vec![problem.into()],
        }
    }

    /// Stable numeric code, as reported to clients.
    pub fn code(&self) -> u32 {
        match self {
            Error::UnknownInputSymbol(_) => 25,
            Error::InvalidOutputSymbol { .. } => 26,
            Error::MalformedDefinition { .. } => 30,
            Error::InvalidSymbolSet { .. } => 31,
            Error::SelfTestFailure { .. } => 32,
            Error::DelimiterMismatch(_) => 33,
            Error::Pattern { .. } => 34,
            Error::Mapping { source, .. } => source.code(),
            Error::UnknownSymbolSet(_) => 40,
            Error::UnknownConverter(_) => 41,
            Error::Io { .. } => 50,
            Error::Load { .. } => 51,
        }
    }

    /// Short human readable name of the error kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::UnknownInputSymbol(_) => "Unknown input symbol",
            Error::InvalidOutputSymbol { .. } => "Invalid output symbol",
            Error::MalformedDefinition { .. } => "Malformed definition",
            Error::InvalidSymbolSet { .. } => "Invalid symbol set",
            Error::SelfTestFailure { .. } => "Self test failure",
            Error::DelimiterMismatch(_) => "Delimiter mismatch",
            Error::Pattern { .. } => "Pattern error",
            Error::Mapping { source, .. } => source.kind_name(),
            Error::UnknownSymbolSet(_) => "No such symbol set",
            Error::UnknownConverter(_) => "No such converter",
            Error::Io { .. } => "I/O error",
            Error::Load { .. } => "Load failure",
        }
    }

    /// The values that made the operation fail (symbols, test failures, names…).
    pub fn values(&self) -> Vec<String> {
        match self {
            Error::UnknownInputSymbol(symbols) => symbols.clone(),
            Error::InvalidOutputSymbol { symbols, .. } => symbols.clone(),
            Error::MalformedDefinition { problems, .. } => problems.clone(),
            Error::InvalidSymbolSet { problems, .. } => problems.clone(),
            Error::SelfTestFailure { failures, .. } => failures.clone(),
            Error::DelimiterMismatch(delim) => vec![delim.clone()],
            Error::Pattern { pattern, .. } => vec![pattern.clone()],
            Error::Mapping { source, .. } => source.values(),
            Error::UnknownSymbolSet(name) | Error::UnknownConverter(name) => vec![name.clone()],
            Error::Io { path, .. } => vec![path.display().to_string()],
            Error::Load { failures, .. } => failures.clone(),
        }
    }

    /// Serializable summary of this error.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error_type: self.kind_name().to_string(),
            error_code: self.code(),
            stage: match self {
                Error::Mapping { stage, .. } => Some(*stage),
                _ => None,
            },
            values: self.values(),
        }
    }
}

/// Client-facing error summary, serialized in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error_type: String,
    pub error_code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<MapStage>,
    pub values: Vec<String>,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.error_type, self.values.join(", "))
    }
}
