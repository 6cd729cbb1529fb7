//! Rewrite rules of a converter.

use crate::error::{Error, Result};
use crate::symbolset::SymbolSet;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

/// `RE` rules may use lookaround and backreferences, so they compile with
/// `fancy_regex`. Derived matchers stay on `regex`.
type RulePattern = fancy_regex::Regex;

static NUMBERED_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$\$)|\$(\d+)").expect("constant pattern"));

/// Brace numbered group references so `$1a` reads as group 1 followed by `a`.
fn brace_group_references(template: &str) -> String {
    NUMBERED_GROUP
        .replace_all(template, |caps: &Captures| match caps.get(2) {
            Some(group) => format!("${{{}}}", group.as_str()),
            None => "$$".to_string(),
        })
        .into_owned()
}

/// One step of a conversion, applied in definition order.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Replace every token equal to `from` with `to`
    Symbol { from: String, to: String },
    /// Replace every match of `from` in the whole transcription
    Pattern { from: RulePattern, to: String },
}

impl Rule {
    pub fn symbol(from: impl Into<String>, to: impl Into<String>) -> Self {
        Rule::Symbol {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Compile a pattern rule. `to` may refer to groups as `$1` or `${1}`.
    pub fn pattern(from: &str, to: impl Into<String>) -> Result<Self> {
        let regex = RulePattern::new(from).map_err(|e| Error::pattern(from, e))?;
        Ok(Rule::Pattern {
            from: regex,
            to: to.into(),
        })
    }

    /// `SYMBOL` or `RE`, as written in definition files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Rule::Symbol { .. } => "SYMBOL",
            Rule::Pattern { .. } => "RE",
        }
    }

    /// The input side, as written in the definition.
    pub fn input(&self) -> &str {
        match self {
            Rule::Symbol { from, .. } => from,
            Rule::Pattern { from, .. } => from.as_str(),
        }
    }

    /// The output side, as written in the definition.
    pub fn output(&self) -> &str {
        match self {
            Rule::Symbol { to, .. } | Rule::Pattern { to, .. } => to,
        }
    }

    /// Apply the rule. Symbol rules tokenize with `symbols` (the source set)
    /// and join the result with its phoneme delimiter.
    pub fn apply(&self, trans: &str, symbols: &SymbolSet) -> Result<String> {
        match self {
            Rule::Symbol { from, to } => {
                let tokens = symbols.split_transcription(trans)?;
                let replaced: Vec<&str> = tokens
                    .iter()
                    .map(|token| if token == from { to.as_str() } else { token.as_str() })
                    .collect();
                Ok(replaced.join(&symbols.phoneme_delimiter().text))
            }
            Rule::Pattern { from, to } => replace_all(from, trans, &brace_group_references(to)),
        }
    }
}

/// Global replace that reports backtracking failures instead of panicking.
fn replace_all(pattern: &RulePattern, trans: &str, template: &str) -> Result<String> {
    let expander = fancy_regex::Expander::default();
    let mut out = String::with_capacity(trans.len());
    let mut last = 0;
    for caps in pattern.captures_iter(trans) {
        let caps = caps.map_err(|e| Error::pattern(pattern.as_str(), e))?;
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&trans[last..whole.start()]);
        expander.append_expansion(&mut out, template, &caps);
        last = whole.end();
    }
    out.push_str(&trans[last..]);
    Ok(out)
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.keyword(), self.input(), self.output())
    }
}
