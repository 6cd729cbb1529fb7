//! Splitting transcriptions into symbols.
//!
//! Two strategies exist. Symbol sets with a non-empty phoneme delimiter are
//! split on runs of that delimiter ([`split_delimited`]). Symbol sets with an
//! empty delimiter are split greedily, always consuming the longest known
//! symbol that prefixes the remaining input and falling back to a single
//! character when nothing matches ([`LongestMatch`]).

use super::symbol::Category;
use crate::error::{Error, Result};
use regex::Regex;

/// Output of a longest-match split.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Split {
    /// Every token, known and unknown, in input order
    pub tokens: Vec<String>,
    /// The unknown tokens only, in input order
    pub unknown: Vec<String>,
}

impl Split {
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Greedy longest-match splitter for symbol sets without a phoneme delimiter.
#[derive(Debug, Clone)]
pub struct LongestMatch {
    symbols: Vec<String>,
    prune: bool,
}

impl LongestMatch {
    /// Prepare a splitter over `(text, category)` pairs.
    ///
    /// Fails if any phoneme delimiter is non-empty: such sets must be split on
    /// their delimiter instead.
    pub fn new<'a>(symbols: impl IntoIterator<Item = (&'a str, Category)>) -> Result<Self> {
        let mut texts = Vec::new();
        for (text, category) in symbols {
            if category == Category::PhonemeDelimiter && !text.is_empty() {
                return Err(Error::DelimiterMismatch(text.to_string()));
            }
            if !text.is_empty() {
                texts.push(text.to_string());
            }
        }
        Ok(Self {
            symbols: texts,
            prune: true,
        })
    }

    /// Toggle dropping candidates that no longer occur in the remaining input.
    /// Output is identical either way.
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn split(&self, input: &str) -> Split {
        let mut candidates: Vec<&str> = self
            .symbols
            .iter()
            .map(String::as_str)
            .filter(|s| input.contains(s))
            .collect();
        // stable: equal lengths keep definition order
        candidates.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut split = Split::default();
        let mut rest = input;
        while !rest.is_empty() {
            if self.prune {
                candidates.retain(|c| rest.contains(c));
            }
            let taken = match candidates.iter().find(|c| rest.starts_with(**c)) {
                Some(known) => known.len(),
                None => {
                    let len = rest.chars().next().map_or(rest.len(), char::len_utf8);
                    split.unknown.push(rest[..len].to_string());
                    len
                }
            };
            split.tokens.push(rest[..taken].to_string());
            rest = &rest[taken..];
        }
        split
    }
}

/// Split on one or more consecutive delimiters, dropping the empty segment a
/// leading or trailing delimiter leaves behind.
pub fn split_delimited(delimiters: &Regex, input: &str) -> Vec<String> {
    let parts: Vec<&str> = delimiters.split(input).collect();
    let last = parts.len().saturating_sub(1);
    parts
        .iter()
        .enumerate()
        .filter(|(i, part)| !((*i == 0 || *i == last) && part.is_empty()))
        .map(|(_, part)| part.to_string())
        .collect()
}
