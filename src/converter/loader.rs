//! Reading `.cnv` converter definitions.
//!
//! One directive per line, fields separated by tabs:
//!
//! ```text
//! FROM	<symbol set>
//! TO	<symbol set>
//! SYMBOL	<from>	<to>
//! RE	<pattern>	<replacement>
//! TEST	<from>	<to>
//! ```
//!
//! Blank lines and lines starting with `//` are skipped, and a trailing
//! `// comment` is stripped from any line.

use super::rule::Rule;
use super::{Converter, ConverterTest};
use crate::error::{Error, Result};
use crate::symbolset::loader::definition_files;
use crate::symbolset::SymbolSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const CONVERTER_EXTENSION: &str = "cnv";

static TRAILING_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*[^/]+)//+.*$").expect("constant pattern"));

/// A parsed definition whose symbol sets haven't been resolved yet.
#[derive(Debug, Clone)]
pub struct ConverterDefinition {
    pub from: String,
    pub to: String,
    pub rules: Vec<Rule>,
    pub tests: Vec<ConverterTest>,
}

fn strip_comment(line: &str) -> &str {
    let line = line.trim();
    let line = match TRAILING_COMMENT.captures(line) {
        Some(caps) => caps.get(1).map_or(line, |m| m.as_str()),
        None => line,
    };
    line.trim()
}

/// The non-empty fields of a directive, or a description of what's wrong.
fn fields<'a>(
    keyword: &str,
    rest: &[&'a str],
    expected: usize,
) -> std::result::Result<Vec<&'a str>, String> {
    if rest.len() != expected {
        return Err(format!(
            "{} takes {} field(s), found {}",
            keyword,
            expected,
            rest.len()
        ));
    }
    if rest.iter().any(|field| field.is_empty()) {
        return Err(format!("{} has an empty field", keyword));
    }
    Ok(rest.to_vec())
}

/// Parse a definition, reporting every malformed line at once.
pub fn parse_definition(source_name: &str, text: &str) -> Result<ConverterDefinition> {
    let mut from: Option<String> = None;
    let mut to: Option<String> = None;
    let mut rules = Vec::new();
    let mut tests = Vec::new();
    let mut problems = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = strip_comment(line);
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let mut parts = line.split('\t');
        let keyword = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();

        let outcome = match keyword {
            "FROM" | "TO" => fields(keyword, &rest, 1).and_then(|f| {
                let slot = if keyword == "FROM" { &mut from } else { &mut to };
                if slot.is_some() {
                    return Err(format!("{} given more than once", keyword));
                }
                *slot = Some(f[0].to_string());
                Ok(())
            }),
            "SYMBOL" => fields(keyword, &rest, 2).map(|f| rules.push(Rule::symbol(f[0], f[1]))),
            "RE" => fields(keyword, &rest, 2).and_then(|f| {
                let rule = Rule::pattern(f[0], f[1]).map_err(|err| err.to_string())?;
                rules.push(rule);
                Ok(())
            }),
            "TEST" => fields(keyword, &rest, 2).map(|f| tests.push(ConverterTest::new(f[0], f[1]))),
            other => Err(format!("unknown directive '{}'", other)),
        };
        if let Err(problem) = outcome {
            problems.push(format!("line {}: {}", line_no, problem));
        }
    }

    if from.is_none() {
        problems.push("missing FROM".to_string());
    }
    if to.is_none() {
        problems.push("missing TO".to_string());
    }
    match (from, to) {
        (Some(from), Some(to)) if problems.is_empty() => Ok(ConverterDefinition {
            from,
            to,
            rules,
            tests,
        }),
        _ => Err(Error::MalformedDefinition {
            source_name: source_name.to_string(),
            problems,
        }),
    }
}

/// Parse a definition and build the converter against already loaded sets.
pub fn parse_converter(
    name: &str,
    text: &str,
    symbol_sets: &HashMap<String, Arc<SymbolSet>>,
) -> Result<Converter> {
    let definition = parse_definition(name, text)?;
    let resolve = |set_name: &str| {
        symbol_sets
            .get(set_name)
            .cloned()
            .ok_or_else(|| Error::UnknownSymbolSet(set_name.to_string()))
    };
    let from = resolve(&definition.from)?;
    let to = resolve(&definition.to)?;
    Converter::new(name, from, to, definition.rules, &definition.tests)
}

/// Load a converter named after the file stem.
pub fn load_converter(
    symbol_sets: &HashMap<String, Arc<SymbolSet>>,
    path: impl AsRef<Path>,
) -> Result<Converter> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let converter = parse_converter(&name, &text, symbol_sets)?;
    tracing::info!(
        name = %converter.name(),
        path = %path.display(),
        rules = converter.rules().len(),
        "loaded converter"
    );
    Ok(converter)
}

/// Load every `.cnv` file in `dir`, sorted by name.
///
/// Fails with [`Error::Load`] listing every file that couldn't be loaded.
pub fn load_converters_from_dir(
    symbol_sets: &HashMap<String, Arc<SymbolSet>>,
    dir: impl AsRef<Path>,
) -> Result<Vec<Converter>> {
    let dir = dir.as_ref();
    let mut converters = Vec::new();
    let mut failures = Vec::new();
    for path in definition_files(dir, CONVERTER_EXTENSION)? {
        match load_converter(symbol_sets, &path) {
            Ok(converter) => converters.push(converter),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "couldn't load converter");
                failures.push(format!("{}: {}", path.display(), err));
            }
        }
    }
    if !failures.is_empty() {
        return Err(Error::Load {
            path: dir.to_path_buf(),
            failures,
        });
    }
    Ok(converters)
}
