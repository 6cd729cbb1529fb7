//! Embedded `TEST` lines of a symbol set definition.
//!
//! ```text
//! TEST	ACCEPT	SYMBOLS	" b A: $ k a
//! TEST	REJECT	IPA	ˈbxɑː.ka
//! ```

use super::catalog::SymbolSet;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Whether the tested transcription must validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Accept,
    Reject,
}

/// Which side of the symbol set a test transcription is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Ipa,
    Symbols,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTest {
    pub expectation: Expectation,
    pub notation: Notation,
    pub transcription: String,
}

pub fn is_test_line(line: &str) -> bool {
    line.starts_with("TEST\t")
}

impl FromStr for SelfTest {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields[0] != "TEST" {
            return Err(format!("test line must start with TEST; found {}", line));
        }
        if fields.len() != 4 {
            return Err(format!(
                "test line must have 4 fields, found {}: {}",
                fields.len(),
                line
            ));
        }
        let expectation = match fields[1] {
            "ACCEPT" => Expectation::Accept,
            "REJECT" => Expectation::Reject,
            other => return Err(format!("invalid test type {} in test line {}", other, line)),
        };
        let notation = match fields[2] {
            "IPA" => Notation::Ipa,
            "SYMBOLS" => Notation::Symbols,
            other => {
                return Err(format!(
                    "invalid symbol type {} in test line {}",
                    other, line
                ))
            }
        };
        Ok(SelfTest {
            expectation,
            notation,
            transcription: fields[3].to_string(),
        })
    }
}

impl fmt::Display for SelfTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expectation = match self.expectation {
            Expectation::Accept => "ACCEPT",
            Expectation::Reject => "REJECT",
        };
        let notation = match self.notation {
            Notation::Ipa => "IPA",
            Notation::Symbols => "SYMBOLS",
        };
        write!(f, "TEST\t{}\t{}\t{}", expectation, notation, self.transcription)
    }
}

/// Parse every test line, reporting all malformed ones at once.
pub fn parse_tests(name: &str, lines: &[String]) -> Result<Vec<SelfTest>> {
    let mut tests = Vec::with_capacity(lines.len());
    let mut problems = Vec::new();
    for line in lines {
        match line.parse::<SelfTest>() {
            Ok(test) => tests.push(test),
            Err(problem) => problems.push(problem),
        }
    }
    if problems.is_empty() {
        Ok(tests)
    } else {
        Err(Error::MalformedDefinition {
            source_name: name.to_string(),
            problems,
        })
    }
}

/// Validation messages for one transcription; empty means valid.
///
/// Unknown symbols reported by the tokenizer count as a message. Any other
/// tokenizer error is returned as is.
pub fn validate(set: &SymbolSet, notation: Notation, trans: &str) -> Result<Vec<String>> {
    let split = match notation {
        Notation::Symbols => set.split_transcription(trans),
        Notation::Ipa => set.split_ipa_transcription(trans),
    };
    let tokens = match split {
        Ok(tokens) => tokens,
        Err(err @ Error::UnknownInputSymbol(_)) => return Ok(vec![err.to_string()]),
        Err(err) => return Err(err),
    };
    let messages = tokens
        .iter()
        .filter(|token| match notation {
            Notation::Symbols => !set.valid_symbol(token),
            Notation::Ipa => !set.valid_ipa_symbol(token),
        })
        .map(|token| format!("invalid transcription symbol '{}' in /{}/", token, trans))
        .collect();
    Ok(messages)
}

/// Run the tests, returning one failure message per failing test.
pub fn run(set: &SymbolSet, tests: &[SelfTest]) -> Result<Vec<String>> {
    let mut failures = Vec::new();
    for test in tests {
        let messages = validate(set, test.notation, &test.transcription)?;
        match test.expectation {
            Expectation::Accept if !messages.is_empty() => failures.push(format!(
                "accept test failed: /{}/: {}",
                test.transcription,
                messages.join("; ")
            )),
            Expectation::Reject if messages.is_empty() => {
                failures.push(format!("reject test failed: /{}/", test.transcription))
            }
            _ => {}
        }
    }
    Ok(failures)
}
