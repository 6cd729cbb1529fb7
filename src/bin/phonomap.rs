//! Command-line interface for phonomap.
//!
//! Usage:
//!   phonomap map `<from>` `<to>` `<transcription>`...        - Map transcriptions between symbol sets (either may be `ipa`)
//!   phonomap convert `<converter>` `<transcription>`...      - Run a rule based converter
//!   phonomap tokenize `<set>` `<transcription>` [--ipa]      - Split a transcription into symbols
//!   phonomap list                                        - List symbol sets and converters
//!   phonomap validate                                    - Load every definition and report all failures
//!
//! Global flags: `--config <file>`, `--symbol-sets <dir>`, `--converters <dir>`, `--json`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use phonomap::converter::load_converter;
use phonomap::converter::loader::CONVERTER_EXTENSION;
use phonomap::symbolset::load_symbol_set;
use phonomap::symbolset::loader::{definition_files, SYMBOL_SET_EXTENSION};
use phonomap::{Error, ErrorReport, Registry};
use phonomap_config::{Loader, PhonomapConfig};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("phonomap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Map and convert phonetic transcriptions between symbol sets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("symbol-sets")
                .long("symbol-sets")
                .global(true)
                .help("Directory with .sym symbol set definitions"),
        )
        .arg(
            Arg::new("converters")
                .long("converters")
                .global(true)
                .help("Directory with .cnv converter definitions"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results and errors as JSON"),
        )
        .subcommand(
            Command::new("map")
                .about("Map transcriptions from one symbol set to another through IPA")
                .arg(Arg::new("from").help("Source symbol set, or 'ipa'").required(true).index(1))
                .arg(Arg::new("to").help("Target symbol set, or 'ipa'").required(true).index(2))
                .arg(
                    Arg::new("transcription")
                        .help("Transcriptions to map")
                        .required(true)
                        .num_args(1..)
                        .index(3),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert transcriptions with a rule based converter")
                .arg(Arg::new("converter").help("Converter name").required(true).index(1))
                .arg(
                    Arg::new("transcription")
                        .help("Transcriptions to convert")
                        .required(true)
                        .num_args(1..)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("tokenize")
                .about("Split a transcription into the symbols of a set")
                .arg(Arg::new("set").help("Symbol set name").required(true).index(1))
                .arg(
                    Arg::new("transcription")
                        .help("Transcription to split")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("ipa")
                        .long("ipa")
                        .action(ArgAction::SetTrue)
                        .help("The transcription is IPA"),
                ),
        )
        .subcommand(Command::new("list").about("List symbol sets and converters"))
        .subcommand(
            Command::new("validate").about("Load every definition and report all failures"),
        )
        .get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(2);
    });
    init_logging(&config.logging.level);

    let output = Output {
        json: config.output.json,
    };
    let ok = match matches.subcommand() {
        Some(("map", sub)) => handle_map_command(&config, sub, &output),
        Some(("convert", sub)) => handle_convert_command(&config, sub, &output),
        Some(("tokenize", sub)) => handle_tokenize_command(&config, sub, &output),
        Some(("list", _)) => handle_list_command(&config, &output),
        Some(("validate", _)) => handle_validate_command(&config, &output),
        _ => unreachable!(),
    };
    if !ok {
        std::process::exit(1);
    }
}

/// Defaults, then the config file, then command line flags.
fn load_config(matches: &ArgMatches) -> Result<PhonomapConfig, phonomap_config::Error> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file("phonomap.toml"),
    };
    if let Some(dir) = matches.get_one::<String>("symbol-sets") {
        loader = loader.set_override("paths.symbol_sets", dir.as_str())?;
    }
    if let Some(dir) = matches.get_one::<String>("converters") {
        loader = loader.set_override("paths.converters", dir.as_str())?;
    }
    if matches.get_flag("json") {
        loader = loader.set_override("output.json", true)?;
    }
    loader.build()
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct Outcome<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: couldn't serialize output: {}", e),
        }
    }

    fn fatal(&self, err: &Error) {
        if self.json {
            self.print_json(&err.report());
        } else {
            eprintln!("Error: {}", err);
        }
    }

    /// Print one result per input. Returns whether all succeeded.
    fn results<'a>(&self, results: Vec<(&'a str, phonomap::Result<String>)>) -> bool {
        let ok = results.iter().all(|(_, result)| result.is_ok());
        if self.json {
            let outcomes: Vec<Outcome<'a>> = results
                .into_iter()
                .map(|(input, result)| match result {
                    Ok(output) => Outcome {
                        input,
                        output: Some(output),
                        error: None,
                    },
                    Err(err) => Outcome {
                        input,
                        output: None,
                        error: Some(err.report()),
                    },
                })
                .collect();
            self.print_json(&outcomes);
        } else {
            for (input, result) in results {
                match result {
                    Ok(output) => println!("{}", output),
                    Err(err) => eprintln!("Error: {}: {}", input, err),
                }
            }
        }
        ok
    }
}

fn load_symbol_sets(config: &PhonomapConfig, registry: &mut Registry) -> phonomap::Result<()> {
    registry.load_symbol_set_dir(&config.paths.symbol_sets)?;
    Ok(())
}

fn transcriptions(matches: &ArgMatches) -> Vec<&str> {
    matches
        .get_many::<String>("transcription")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default()
}

/// Handle the map command
fn handle_map_command(config: &PhonomapConfig, matches: &ArgMatches, output: &Output) -> bool {
    let mut registry = Registry::new();
    if let Err(e) = load_symbol_sets(config, &mut registry) {
        output.fatal(&e);
        return false;
    }
    let from = matches.get_one::<String>("from").map_or("", String::as_str);
    let to = matches.get_one::<String>("to").map_or("", String::as_str);
    let results = transcriptions(matches)
        .into_iter()
        .map(|input| (input, registry.map(from, to, input)))
        .collect();
    output.results(results)
}

/// Handle the convert command
fn handle_convert_command(config: &PhonomapConfig, matches: &ArgMatches, output: &Output) -> bool {
    let mut registry = Registry::new();
    let loaded = load_symbol_sets(config, &mut registry)
        .and_then(|_| registry.load_converter_dir(&config.paths.converters));
    if let Err(e) = loaded {
        output.fatal(&e);
        return false;
    }
    let name = matches.get_one::<String>("converter").map_or("", String::as_str);
    let results = transcriptions(matches)
        .into_iter()
        .map(|input| (input, registry.convert(name, input)))
        .collect();
    output.results(results)
}

/// Handle the tokenize command
fn handle_tokenize_command(config: &PhonomapConfig, matches: &ArgMatches, output: &Output) -> bool {
    let mut registry = Registry::new();
    let name = matches.get_one::<String>("set").map_or("", String::as_str);
    let input = matches
        .get_one::<String>("transcription")
        .map_or("", String::as_str);
    let tokens = load_symbol_sets(config, &mut registry)
        .and_then(|_| registry.symbol_set(name))
        .and_then(|set| {
            if matches.get_flag("ipa") {
                set.split_ipa_transcription(input)
            } else {
                set.split_transcription(input)
            }
        });
    match tokens {
        Ok(tokens) if output.json => {
            output.print_json(&tokens);
            true
        }
        Ok(tokens) => {
            for token in tokens {
                println!("/{}/", token);
            }
            true
        }
        Err(e) => {
            output.fatal(&e);
            false
        }
    }
}

#[derive(Serialize)]
struct SymbolSetEntry {
    name: String,
    kind: String,
    symbols: usize,
}

#[derive(Serialize)]
struct ConverterEntry {
    name: String,
    from: String,
    to: String,
}

#[derive(Serialize)]
struct Listing {
    symbol_sets: Vec<SymbolSetEntry>,
    converters: Vec<ConverterEntry>,
}

/// Handle the list command
fn handle_list_command(config: &PhonomapConfig, output: &Output) -> bool {
    let mut registry = Registry::new();
    if let Err(e) = load_symbol_sets(config, &mut registry) {
        output.fatal(&e);
        return false;
    }
    if config.paths.converters.is_dir() {
        if let Err(e) = registry.load_converter_dir(&config.paths.converters) {
            output.fatal(&e);
            return false;
        }
    }

    let listing = Listing {
        symbol_sets: registry
            .symbol_set_names()
            .iter()
            .filter_map(|name| registry.symbol_set(name).ok())
            .map(|set| SymbolSetEntry {
                name: set.name().to_string(),
                kind: set.kind().to_string(),
                symbols: set.symbols().len(),
            })
            .collect(),
        converters: registry
            .converter_names()
            .iter()
            .filter_map(|name| registry.converter(name).ok())
            .map(|converter| ConverterEntry {
                name: converter.name().to_string(),
                from: converter.from().name().to_string(),
                to: converter.to().name().to_string(),
            })
            .collect(),
    };

    if output.json {
        output.print_json(&listing);
        return true;
    }
    println!("Symbol sets:\n");
    for set in &listing.symbol_sets {
        println!("  {:<32} {:<6} {} symbols", set.name, set.kind, set.symbols);
    }
    println!("\nConverters:\n");
    for converter in &listing.converters {
        println!("  {:<32} {} -> {}", converter.name, converter.from, converter.to);
    }
    true
}

#[derive(Serialize)]
struct Failure {
    path: String,
    error: ErrorReport,
    message: String,
}

/// Load every definition file on its own so that one broken file doesn't
/// hide the others.
fn validate_files<T>(
    dir: &Path,
    extension: &str,
    mut load: impl FnMut(&Path) -> phonomap::Result<T>,
    loaded: &mut Vec<T>,
    failures: &mut Vec<Failure>,
) {
    let files = match definition_files(dir, extension) {
        Ok(files) => files,
        Err(err) => {
            failures.push(Failure {
                path: dir.display().to_string(),
                error: err.report(),
                message: err.to_string(),
            });
            return;
        }
    };
    for path in files {
        match load(&path) {
            Ok(item) => loaded.push(item),
            Err(err) => failures.push(Failure {
                path: path.display().to_string(),
                error: err.report(),
                message: err.to_string(),
            }),
        }
    }
}

/// Handle the validate command
fn handle_validate_command(config: &PhonomapConfig, output: &Output) -> bool {
    let mut sets = Vec::new();
    let mut failures = Vec::new();
    validate_files(
        &config.paths.symbol_sets,
        SYMBOL_SET_EXTENSION,
        |path| load_symbol_set(path),
        &mut sets,
        &mut failures,
    );
    let by_name: HashMap<String, Arc<phonomap::SymbolSet>> = sets
        .into_iter()
        .map(|set| (set.name().to_string(), Arc::new(set)))
        .collect();

    let mut converters = Vec::new();
    if config.paths.converters.is_dir() {
        validate_files(
            &config.paths.converters,
            CONVERTER_EXTENSION,
            |path| load_converter(&by_name, path),
            &mut converters,
            &mut failures,
        );
    }

    if output.json {
        output.print_json(&failures);
    } else {
        for failure in &failures {
            println!("FAIL {}: {}", failure.path, failure.message);
        }
        println!(
            "{} symbol set(s), {} converter(s), {} failure(s)",
            by_name.len(),
            converters.len(),
            failures.len()
        );
    }
    failures.is_empty()
}
