//! Transcription symbols, their categories and the symbol set kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a transcription symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Syllabic phonemes (typically vowels and syllabic consonants)
    Syllabic,
    /// Non-syllabic phonemes (typically consonants)
    NonSyllabic,
    /// Stress and accent symbols (primary, secondary, tone accents)
    Stress,
    /// Phoneme delimiters (white space, the empty string)
    PhonemeDelimiter,
    SyllableDelimiter,
    /// Morpheme boundaries that need not align with the decompounded orthography
    MorphemeDelimiter,
    /// Compound boundaries aligned with the decompounded orthography
    CompoundDelimiter,
    WordDelimiter,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Syllabic,
        Category::NonSyllabic,
        Category::Stress,
        Category::PhonemeDelimiter,
        Category::SyllableDelimiter,
        Category::MorphemeDelimiter,
        Category::CompoundDelimiter,
        Category::WordDelimiter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Syllabic => "Syllabic",
            Category::NonSyllabic => "NonSyllabic",
            Category::Stress => "Stress",
            Category::PhonemeDelimiter => "PhonemeDelimiter",
            Category::SyllableDelimiter => "SyllableDelimiter",
            Category::MorphemeDelimiter => "MorphemeDelimiter",
            Category::CompoundDelimiter => "CompoundDelimiter",
            Category::WordDelimiter => "WordDelimiter",
        }
    }

    /// Syllabic, non-syllabic and stress symbols.
    pub fn is_phoneme(&self) -> bool {
        matches!(
            self,
            Category::Syllabic | Category::NonSyllabic | Category::Stress
        )
    }

    /// Syllabic and non-syllabic symbols.
    pub fn is_phonetic(&self) -> bool {
        matches!(self, Category::Syllabic | Category::NonSyllabic)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|cat| cat.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown symbol category {}", s))
    }
}

/// Kind of a symbol set, used to pick accent/stress placement filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// The phone set of the CMU pronouncing dictionary
    Cmu,
    Sampa,
    Ipa,
    /// Symbol sets not covered by the other kinds
    Other,
}

impl Kind {
    /// Infer the kind from a symbol set name.
    ///
    /// The check is case-insensitive and ordered: `ipa`, then `sampa`, then `cmu`.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("ipa") {
            Kind::Ipa
        } else if name.contains("sampa") {
            Kind::Sampa
        } else if name.contains("cmu") {
            Kind::Cmu
        } else {
            Kind::Other
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Cmu => "CMU",
            Kind::Sampa => "SAMPA",
            Kind::Ipa => "IPA",
            Kind::Other => "Other",
        };
        f.write_str(s)
    }
}

/// An IPA string together with its declared code point trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpaSymbol {
    pub text: String,
    pub unicode: String,
}

impl IpaSymbol {
    /// Build an IPA symbol whose trace is computed from the text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let unicode = codepoint_trace(&text);
        Self { text, unicode }
    }

    /// Build an IPA symbol with an explicitly declared trace (as read from a file).
    pub fn with_unicode(text: impl Into<String>, unicode: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            unicode: unicode.into(),
        }
    }
}

/// A phoneme, stress or delimiter symbol used in transcriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub text: String,
    pub category: Category,
    pub description: String,
    pub ipa: IpaSymbol,
}

impl Symbol {
    pub fn new(
        text: impl Into<String>,
        category: Category,
        description: impl Into<String>,
        ipa: IpaSymbol,
    ) -> Self {
        Self {
            text: text.into(),
            category,
            description: description.into(),
            ipa,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/ [{}] {}", self.text, self.ipa.text, self.category)
    }
}

/// Code point dump of a string: `U+XXXX` per scalar value, no separators.
///
/// `"ɑː"` becomes `"U+0251U+02D0"`; the empty string yields the empty string.
pub fn codepoint_trace(s: &str) -> String {
    s.chars().map(|c| format!("U+{:04X}", c as u32)).collect()
}
