//! Classification matchers derived from a symbol list.
//!
//! A matcher is an alternation of the escaped member strings, longest first,
//! so that the leftmost-first regex semantics always pick the longest legal
//! member at a position. Ties are ordered alphabetically which keeps the
//! generated pattern stable across runs.

use super::symbol::{Category, Symbol};
use crate::error::{Error, Result};
use regex::Regex;

/// A subset of a symbol set's symbols, selected by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subset {
    /// Syllabic, non-syllabic and stress symbols
    Phonemes,
    /// Syllabic and non-syllabic symbols
    Phonetic,
    Stress,
    Syllabic,
    NonSyllabic,
    PhonemeDelimiters,
    /// Every symbol in the set
    All,
}

impl Subset {
    pub const ALL: [Subset; 7] = [
        Subset::Phonemes,
        Subset::Phonetic,
        Subset::Stress,
        Subset::Syllabic,
        Subset::NonSyllabic,
        Subset::PhonemeDelimiters,
        Subset::All,
    ];

    pub fn contains(&self, category: Category) -> bool {
        match self {
            Subset::Phonemes => category.is_phoneme(),
            Subset::Phonetic => category.is_phonetic(),
            Subset::Stress => category == Category::Stress,
            Subset::Syllabic => category == Category::Syllabic,
            Subset::NonSyllabic => category == Category::NonSyllabic,
            Subset::PhonemeDelimiters => category == Category::PhonemeDelimiter,
            Subset::All => true,
        }
    }

    fn index(&self) -> usize {
        match self {
            Subset::Phonemes => 0,
            Subset::Phonetic => 1,
            Subset::Stress => 2,
            Subset::Syllabic => 3,
            Subset::NonSyllabic => 4,
            Subset::PhonemeDelimiters => 5,
            Subset::All => 6,
        }
    }
}

/// Alternation over one subset of symbol strings.
#[derive(Debug, Clone)]
pub struct Matcher {
    group: Regex,
}

impl Matcher {
    /// Build a matcher from member strings. Empty strings never take part in
    /// matching; a matcher without members matches only the empty string.
    pub fn new<'a>(texts: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut sorted: Vec<&str> = texts.into_iter().filter(|t| !t.is_empty()).collect();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        sorted.dedup();

        let alternation = sorted
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!("(?:{})", alternation);
        let group = Regex::new(&pattern).map_err(|e| Error::pattern(&pattern, e))?;
        Ok(Self { group })
    }

    /// The non-capturing alternation, for embedding in larger patterns.
    pub fn pattern(&self) -> &str {
        self.group.as_str()
    }

    /// A pattern matching one or more consecutive members.
    pub fn repeated(&self) -> Result<Regex> {
        let pattern = format!("{}+", self.pattern());
        Regex::new(&pattern).map_err(|e| Error::pattern(&pattern, e))
    }
}

/// Native and IPA matchers for every [`Subset`] of a symbol set.
#[derive(Debug, Clone)]
pub struct Matchers {
    native: Vec<Matcher>,
    ipa: Vec<Matcher>,
}

impl Matchers {
    pub fn build(symbols: &[Symbol]) -> Result<Self> {
        let mut native = Vec::with_capacity(Subset::ALL.len());
        let mut ipa = Vec::with_capacity(Subset::ALL.len());
        for subset in Subset::ALL {
            let members = || symbols.iter().filter(move |s| subset.contains(s.category));
            native.push(Matcher::new(members().map(|s| s.text.as_str()))?);
            ipa.push(Matcher::new(members().map(|s| s.ipa.text.as_str()))?);
        }
        Ok(Self { native, ipa })
    }

    pub fn native(&self, subset: Subset) -> &Matcher {
        &self.native[subset.index()]
    }

    pub fn ipa(&self, subset: Subset) -> &Matcher {
        &self.ipa[subset.index()]
    }
}
