//! Reading `.sym` symbol set definitions.
//!
//! A definition is a tab separated table with a fixed header:
//!
//! ```text
//! DESCRIPTION	SYMBOL	IPA	IPA UNICODE	CATEGORY
//! sil	p	p	U+0070	NonSyllabic
//! phoneme delimiter	 		 	PhonemeDelimiter
//! TEST	ACCEPT	SYMBOLS	p a
//! ```
//!
//! Blank lines and `#` comments are skipped. `TEST` lines are embedded self
//! tests (see [`super::selftest`]).

use super::catalog::SymbolSet;
use super::selftest::is_test_line;
use super::symbol::{Category, IpaSymbol, Symbol};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

pub const SYMBOL_SET_EXTENSION: &str = "sym";
pub const HEADER: &str = "DESCRIPTION\tSYMBOL\tIPA\tIPA UNICODE\tCATEGORY";

/// Parsed rows of a definition, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    pub symbols: Vec<Symbol>,
    pub tests: Vec<String>,
}

/// Trim surrounding white space, unless that would leave nothing (a lone
/// space is a legal delimiter symbol).
fn trim_if_needed(field: &str) -> &str {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        field
    } else {
        trimmed
    }
}

fn parse_row(line: &str) -> std::result::Result<Symbol, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 5 {
        return Err(format!("expected 5 fields, found {}: {}", fields.len(), line));
    }
    let category: Category = fields[4].trim().parse()?;
    Ok(Symbol::new(
        trim_if_needed(fields[1]),
        category,
        fields[0],
        IpaSymbol::with_unicode(trim_if_needed(fields[2]), trim_if_needed(fields[3])),
    ))
}

/// Parse the rows of a definition, reporting every malformed line at once.
pub fn parse_definition(source_name: &str, text: &str) -> Result<Definition> {
    let mut definition = Definition::default();
    let mut problems = Vec::new();
    let mut seen_header = false;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !seen_header {
            seen_header = true;
            if line != HEADER {
                problems.push(format!(
                    "line {}: expected header '{}', found '{}'",
                    line_no, HEADER, line
                ));
            }
            continue;
        }
        if is_test_line(line) {
            definition.tests.push(line.to_string());
            continue;
        }
        match parse_row(line) {
            Ok(symbol) => definition.symbols.push(symbol),
            Err(problem) => problems.push(format!("line {}: {}", line_no, problem)),
        }
    }

    if !seen_header {
        problems.push(format!("missing header '{}'", HEADER));
    }
    if problems.is_empty() {
        Ok(definition)
    } else {
        Err(Error::MalformedDefinition {
            source_name: source_name.to_string(),
            problems,
        })
    }
}

/// Parse and build a symbol set from definition text.
pub fn parse_symbol_set(name: &str, text: &str) -> Result<SymbolSet> {
    let definition = parse_definition(name, text)?;
    SymbolSet::with_tests(name, definition.symbols, &definition.tests, true)
}

/// Load a symbol set named after the file stem.
pub fn load_symbol_set(path: impl AsRef<Path>) -> Result<SymbolSet> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_symbol_set_with_name(&name, path)
}

pub fn load_symbol_set_with_name(name: &str, path: impl AsRef<Path>) -> Result<SymbolSet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let set = parse_symbol_set(name, &text)?;
    tracing::info!(
        name = %set.name(),
        path = %path.display(),
        symbols = set.symbols().len(),
        "loaded symbol set"
    );
    Ok(set)
}

/// Load every `.sym` file in `dir`, sorted by name.
///
/// Fails with [`Error::Load`] listing every file that couldn't be loaded.
pub fn load_symbol_sets_from_dir(dir: impl AsRef<Path>) -> Result<Vec<SymbolSet>> {
    let dir = dir.as_ref();
    let mut sets: Vec<SymbolSet> = Vec::new();
    let mut failures = Vec::new();
    for path in definition_files(dir, SYMBOL_SET_EXTENSION)? {
        match load_symbol_set(&path) {
            Ok(set) if sets.iter().any(|s| s.name() == set.name()) => {
                tracing::warn!(name = %set.name(), "duplicate symbol set name, keeping the first");
            }
            Ok(set) => sets.push(set),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "couldn't load symbol set");
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
    sets.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(sets)
}

/// Files in `dir` with the given extension, sorted by path.
pub fn definition_files(dir: &Path, extension: &str) -> Result<Vec<std::path::PathBuf>> {
    let io_error = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# a comment before the header
DESCRIPTION\tSYMBOL\tIPA\tIPA UNICODE\tCATEGORY
sil\tp\tp\tU+0070\tNonSyllabic
sil\ta \t a\tU+0061\tSyllabic
phoneme delimiter\t \t\t\tPhonemeDelimiter

TEST\tACCEPT\tSYMBOLS\tp a
";

    #[test]
    fn parses_rows_and_tests() {
        let definition = parse_definition("sample", SAMPLE).unwrap();
        let texts: Vec<&str> = definition.symbols.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["p", "a", " "]);
        assert_eq!(definition.symbols[1].ipa.text, "a");
        assert_eq!(definition.symbols[2].ipa.text, "");
        assert_eq!(definition.tests, vec!["TEST\tACCEPT\tSYMBOLS\tp a"]);
    }

    #[test]
    fn builds_a_symbol_set() {
        let set = parse_symbol_set("sample", SAMPLE).unwrap();
        assert_eq!(set.convert_to_ipa("p a").unwrap(), "pa");
    }

    #[test]
    fn tolerates_crlf() {
        let text = SAMPLE.replace('\n', "\r\n");
        assert!(parse_symbol_set("sample", &text).is_ok());
    }

    #[test]
    fn reports_all_malformed_lines() {
        let text = "\
DESCRIPTION\tSYMBOL\tIPA\tIPA UNICODE\tCATEGORY
sil\tp\tp\tU+0070
sil\ta\ta\tU+0061\tVowel
phoneme delimiter\t \t\t\tPhonemeDelimiter
";
        match parse_definition("broken", text) {
            Err(Error::MalformedDefinition { source_name, problems }) => {
                assert_eq!(source_name, "broken");
                assert_eq!(problems.len(), 2);
                assert!(problems[0].starts_with("line 2:"));
                assert!(problems[1].starts_with("line 3:"));
            }
            other => panic!("expected malformed definition, got {:?}", other),
        }
    }

    #[test]
    fn requires_the_header_first() {
        let text = "sil\tp\tp\tU+0070\tNonSyllabic\n";
        assert!(matches!(
            parse_definition("x", text),
            Err(Error::MalformedDefinition { .. })
        ));
        assert!(matches!(
            parse_definition("x", "# only comments\n\n"),
            Err(Error::MalformedDefinition { .. })
        ));
    }
}
