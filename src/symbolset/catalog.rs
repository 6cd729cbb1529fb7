//! The symbol set: a validated list of symbols plus everything derived from it.

use super::filters::Filters;
use super::matchers::{Matchers, Subset};
use super::selftest;
use super::symbol::{codepoint_trace, Category, Kind, Symbol};
use super::tokenizer::{split_delimited, LongestMatch};
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// How one side (native or IPA) of a symbol set is split into symbols.
#[derive(Debug, Clone)]
enum Splitter {
    /// Runs of the native phoneme delimiters
    Delimited(Regex),
    /// A single literal delimiter string
    Literal(String),
    LongestMatch(LongestMatch),
}

impl Splitter {
    fn split(&self, input: &str) -> Result<Vec<String>> {
        match self {
            Splitter::Delimited(delimiters) => Ok(split_delimited(delimiters, input)),
            Splitter::Literal(delimiter) => Ok(input
                .split(delimiter.as_str())
                .map(str::to_string)
                .collect()),
            Splitter::LongestMatch(splitter) => {
                let split = splitter.split(input);
                if split.is_clean() {
                    Ok(split.tokens)
                } else {
                    Err(Error::UnknownInputSymbol(dedup(split.unknown)))
                }
            }
        }
    }
}

/// Keep the first occurrence of each string.
pub(crate) fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// A named, validated set of transcription symbols.
///
/// Immutable once built. Lookups by native or IPA text resolve to the first
/// symbol in definition order, so when several symbols share an IPA text the
/// earliest one wins on the way back from IPA.
#[derive(Debug, Clone)]
pub struct SymbolSet {
    name: String,
    kind: Kind,
    symbols: Vec<Symbol>,
    phoneme_delimiter: usize,
    by_text: HashMap<String, usize>,
    by_ipa: HashMap<String, usize>,
    matchers: Matchers,
    filters: Filters,
    native: Splitter,
    ipa: Splitter,
    delimiter_runs: Option<Regex>,
}

impl SymbolSet {
    /// Build a symbol set without embedded tests, rejecting duplicate symbols.
    pub fn new(name: impl Into<String>, symbols: Vec<Symbol>) -> Result<Self> {
        Self::with_tests(name, symbols, &[], true)
    }

    /// Build a symbol set and run its embedded `TEST` lines.
    ///
    /// Structural problems are collected and reported together as
    /// [`Error::InvalidSymbolSet`]; failing tests as [`Error::SelfTestFailure`].
    pub fn with_tests(
        name: impl Into<String>,
        symbols: Vec<Symbol>,
        test_lines: &[String],
        check_duplicates: bool,
    ) -> Result<Self> {
        let name = name.into();
        check_structure(&name, &symbols, check_duplicates)?;

        let phoneme_delimiter = symbols
            .iter()
            .position(|s| s.category == Category::PhonemeDelimiter)
            .ok_or_else(|| Error::InvalidSymbolSet {
                name: name.clone(),
                problems: vec!["no phoneme delimiter defined".to_string()],
            })?;

        let mut by_text = HashMap::new();
        let mut by_ipa = HashMap::new();
        for (i, symbol) in symbols.iter().enumerate() {
            by_text.entry(symbol.text.clone()).or_insert(i);
            by_ipa.entry(symbol.ipa.text.clone()).or_insert(i);
        }

        let matchers = Matchers::build(&symbols)?;
        let has_syllable_delimiter = symbols
            .iter()
            .any(|s| s.category == Category::SyllableDelimiter);
        let filters = Filters::build(&matchers, has_syllable_delimiter)?;

        let delimiter_free = symbols
            .iter()
            .any(|s| s.category == Category::PhonemeDelimiter && s.text.is_empty());
        let (native, delimiter_runs) = if delimiter_free {
            let splitter =
                LongestMatch::new(symbols.iter().map(|s| (s.text.as_str(), s.category)))?;
            (Splitter::LongestMatch(splitter), None)
        } else {
            let runs = matchers.native(Subset::PhonemeDelimiters).repeated()?;
            (Splitter::Delimited(runs.clone()), Some(runs))
        };

        let ipa_delimiter = &symbols[phoneme_delimiter].ipa.text;
        let ipa = if ipa_delimiter.is_empty() {
            let splitter =
                LongestMatch::new(symbols.iter().map(|s| (s.ipa.text.as_str(), s.category)))?;
            Splitter::LongestMatch(splitter)
        } else {
            Splitter::Literal(ipa_delimiter.clone())
        };

        let kind = Kind::from_name(&name);
        tracing::debug!(
            name = %name,
            kind = %kind,
            symbols = symbols.len(),
            delimiter_free,
            "built symbol set"
        );

        let set = Self {
            name,
            kind,
            symbols,
            phoneme_delimiter,
            by_text,
            by_ipa,
            matchers,
            filters,
            native,
            ipa,
            delimiter_runs,
        };

        let tests = selftest::parse_tests(&set.name, test_lines)?;
        let failures = selftest::run(&set, &tests)?;
        if !failures.is_empty() {
            return Err(Error::SelfTestFailure {
                name: set.name.clone(),
                failures,
            });
        }
        Ok(set)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// All symbols in definition order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The first phoneme delimiter in definition order; used when joining.
    pub fn phoneme_delimiter(&self) -> &Symbol {
        &self.symbols[self.phoneme_delimiter]
    }

    pub fn subset(&self, subset: Subset) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols
            .iter()
            .filter(move |s| subset.contains(s.category))
    }

    pub fn matchers(&self) -> &Matchers {
        &self.matchers
    }

    pub fn has_syllable_delimiter(&self) -> bool {
        self.symbols
            .iter()
            .any(|s| s.category == Category::SyllableDelimiter)
    }

    /// True when phonemes are written without separators and split greedily.
    pub fn is_delimiter_free(&self) -> bool {
        matches!(self.native, Splitter::LongestMatch(_))
    }

    pub fn valid_symbol(&self, text: &str) -> bool {
        self.by_text.contains_key(text)
    }

    pub fn valid_ipa_symbol(&self, text: &str) -> bool {
        self.by_ipa.contains_key(text)
    }

    pub fn get(&self, text: &str) -> Option<&Symbol> {
        self.by_text.get(text).map(|&i| &self.symbols[i])
    }

    /// The first symbol in definition order whose IPA text is `ipa`.
    pub fn get_from_ipa(&self, ipa: &str) -> Option<&Symbol> {
        self.by_ipa.get(ipa).map(|&i| &self.symbols[i])
    }

    /// Split a native transcription into symbols.
    ///
    /// Delimited sets split on runs of the delimiter and never fail; tokens are
    /// not checked. Delimiter-free sets fail with [`Error::UnknownInputSymbol`]
    /// if any part of the input isn't a known symbol.
    pub fn split_transcription(&self, input: &str) -> Result<Vec<String>> {
        self.native.split(input)
    }

    /// Split an IPA transcription into IPA symbols, after moving tone accents
    /// into their canonical position.
    pub fn split_ipa_transcription(&self, input: &str) -> Result<Vec<String>> {
        let input = self.filters.before_from_ipa(input);
        self.ipa.split(&input)
    }

    /// Whether any token of `trans` is one of `symbols`.
    pub fn contains_symbols(&self, trans: &str, symbols: &[Symbol]) -> Result<bool> {
        let tokens = self.split_transcription(trans)?;
        Ok(tokens
            .iter()
            .any(|token| symbols.iter().any(|s| &s.text == token)))
    }

    pub fn convert_to_ipa(&self, trans: &str) -> Result<String> {
        let trans = self.filters.pre(self.kind, trans);
        let tokens = self.split_transcription(&trans)?;

        let mut unknown = Vec::new();
        let mut mapped = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.get(&token) {
                Some(symbol) if symbol.ipa.text.is_empty() => {}
                Some(symbol) => mapped.push(symbol.ipa.text.as_str()),
                None => unknown.push(token),
            }
        }
        if !unknown.is_empty() {
            return Err(Error::UnknownInputSymbol(dedup(unknown)));
        }

        let joined = mapped.join(&self.phoneme_delimiter().ipa.text);
        Ok(self.filters.post(Kind::Ipa, &joined))
    }

    pub fn convert_from_ipa(&self, trans: &str) -> Result<String> {
        let tokens = self.split_ipa_transcription(trans)?;

        let mut unknown = Vec::new();
        let mut mapped = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.get_from_ipa(&token) {
                Some(symbol) if symbol.text.is_empty() => {}
                Some(symbol) => mapped.push(symbol.text.as_str()),
                None => unknown.push(token),
            }
        }
        if !unknown.is_empty() {
            return Err(Error::UnknownInputSymbol(dedup(unknown)));
        }

        let delimiter = &self.phoneme_delimiter().text;
        let mut joined = mapped.join(delimiter);
        if let Some(runs) = &self.delimiter_runs {
            joined = runs.replace_all(&joined, regex::NoExpand(delimiter)).into_owned();
        }
        Ok(self.filters.post(self.kind, &joined))
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {} symbols)", self.name, self.kind, self.symbols.len())
    }
}

fn check_structure(name: &str, symbols: &[Symbol], check_duplicates: bool) -> Result<()> {
    let mut problems = Vec::new();

    if !symbols
        .iter()
        .any(|s| s.category == Category::PhonemeDelimiter)
    {
        problems.push("no phoneme delimiter defined".to_string());
    }

    for symbol in symbols {
        let expected = codepoint_trace(&symbol.ipa.text);
        if symbol.ipa.unicode != expected {
            problems.push(format!(
                "ipa symbol /{}/ does not match unicode '{}', expected '{}'",
                symbol.ipa.text, symbol.ipa.unicode, expected
            ));
        }
        if symbol.ipa.text.chars().any(char::is_whitespace) {
            problems.push(format!(
                "ipa symbols cannot contain white space, found /{}/",
                symbol.ipa.text
            ));
        }
    }

    if check_duplicates {
        let mut seen = HashMap::new();
        let mut duplicates = Vec::new();
        for symbol in symbols {
            let count = seen.entry(symbol.text.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(symbol.text.clone());
            }
        }
        for duplicate in duplicates {
            problems.push(format!("duplicate symbol /{}/", duplicate));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidSymbolSet {
            name: name.to_string(),
            problems,
        })
    }
}
