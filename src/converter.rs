//! Rule based conversion between the symbol sets of different languages.
//!
//! A converter rewrites a transcription in one symbol set into another with an
//! ordered list of [`Rule`]s, for example US English SAMPA into Swedish SAMPA:
//!
//! ```text
//! FROM	en-us_ws-sampa
//! TO	sv-se_ws-sampa
//!
//! RE	^T	t
//! SYMBOL	i	I
//! SYMBOL	T	t
//!
//! TEST	T i s	t I s
//! ```
//!
//! Building a converter checks it against both symbol sets and its own tests,
//! so a converter that exists produces valid target transcriptions for every
//! source symbol.

pub mod loader;
pub mod rule;

pub use loader::{load_converter, load_converters_from_dir, parse_converter};
pub use rule::Rule;

use crate::error::{Error, Result};
use crate::symbolset::SymbolSet;
use serde::Serialize;
use std::sync::Arc;

/// An example conversion that a converter must reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterTest {
    pub from: String,
    pub to: String,
}

impl ConverterTest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl TestResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Converter {
    name: String,
    from: Arc<SymbolSet>,
    to: Arc<SymbolSet>,
    rules: Vec<Rule>,
}

impl Converter {
    /// Build a converter, failing with [`Error::SelfTestFailure`] unless every
    /// example and internal consistency check passes.
    pub fn new(
        name: impl Into<String>,
        from: Arc<SymbolSet>,
        to: Arc<SymbolSet>,
        rules: Vec<Rule>,
        tests: &[ConverterTest],
    ) -> Result<Self> {
        let converter = Self {
            name: name.into(),
            from,
            to,
            rules,
        };
        let result = converter.test(tests)?;
        if !result.ok {
            return Err(Error::SelfTestFailure {
                name: converter.name,
                failures: result.errors,
            });
        }
        tracing::debug!(
            name = %converter.name,
            from = %converter.from.name(),
            to = %converter.to.name(),
            rules = converter.rules.len(),
            "built converter"
        );
        Ok(converter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from(&self) -> &Arc<SymbolSet> {
        &self.from
    }

    pub fn to(&self) -> &Arc<SymbolSet> {
        &self.to
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether this converter reads or writes the named symbol set.
    pub fn uses(&self, symbol_set: &str) -> bool {
        self.from.name() == symbol_set || self.to.name() == symbol_set
    }

    pub fn convert(&self, input: &str) -> Result<String> {
        let mut output = input.to_string();
        for rule in &self.rules {
            output = rule.apply(&output, &self.from)?;
        }
        let symbols = invalid_symbols(&output, &self.to)?;
        if symbols.is_empty() {
            Ok(output)
        } else {
            Err(Error::InvalidOutputSymbol { output, symbols })
        }
    }

    /// Run the example tests and the internal consistency checks.
    pub fn test(&self, tests: &[ConverterTest]) -> Result<TestResult> {
        let mut errors = self.test_examples(tests);
        errors.extend(self.test_internals()?);
        Ok(TestResult::from_errors(errors))
    }

    fn test_examples(&self, tests: &[ConverterTest]) -> Vec<String> {
        let mut errors = Vec::new();
        for test in tests {
            match self.convert(&test.from) {
                Ok(output) if output == test.to => {}
                Ok(output) => errors.push(format!(
                    "from /{}/ expected /{}/, but got /{}/",
                    test.from, test.to, output
                )),
                Err(err) => errors.push(format!(
                    "from /{}/ expected /{}/: {}",
                    test.from, test.to, err
                )),
            }
        }
        errors
    }

    fn test_internals(&self) -> Result<Vec<String>> {
        let mut errors = Vec::new();

        for symbol in self.from.symbols() {
            if let Err(err) = self.convert(&symbol.text) {
                errors.push(format!("input symbol /{}/: {}", symbol.text, err));
            }
        }

        for symbol in self.from.symbols() {
            let has_rule = self
                .rules
                .iter()
                .any(|rule| matches!(rule, Rule::Symbol { from, .. } if from == &symbol.text));
            if !self.to.valid_symbol(&symbol.text) && !has_rule {
                errors.push(format!(
                    "symbol rule needed for input symbol /{}/",
                    symbol.text
                ));
            }
        }

        for rule in &self.rules {
            if let Rule::Symbol { from, .. } = rule {
                let invalid = invalid_symbols(from, &self.from)?;
                if !invalid.is_empty() {
                    errors.push(format!(
                        "invalid input symbol(s) for rule {}: {}",
                        rule,
                        invalid.join(", ")
                    ));
                }
            }
            let invalid = invalid_symbols(rule.output(), &self.to)?;
            if !invalid.is_empty() {
                errors.push(format!(
                    "invalid output symbol(s) for rule {}: {}",
                    rule,
                    invalid.join(", ")
                ));
            }
        }

        Ok(errors)
    }
}

/// Tokens of `trans` that aren't symbols of `symbols`.
///
/// A transcription that is exactly the phoneme delimiter is valid.
fn invalid_symbols(trans: &str, symbols: &SymbolSet) -> Result<Vec<String>> {
    if trans == symbols.phoneme_delimiter().text {
        return Ok(Vec::new());
    }
    match symbols.split_transcription(trans) {
        Ok(tokens) => Ok(tokens
            .into_iter()
            .filter(|token| !symbols.valid_symbol(token))
            .collect()),
        Err(Error::UnknownInputSymbol(unknown)) => Ok(unknown),
        Err(err) => Err(err),
    }
}
