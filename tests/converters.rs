use phonomap::converter::{load_converters_from_dir, parse_converter};
use phonomap::symbolset::load_symbol_sets_from_dir;
use phonomap::{Error, SymbolSet};
use rstest::rstest;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

fn symbol_sets() -> HashMap<String, Arc<SymbolSet>> {
    load_symbol_sets_from_dir("test_data")
        .unwrap()
        .into_iter()
        .map(|set| (set.name().to_string(), Arc::new(set)))
        .collect()
}

#[test]
fn loads_converters_from_the_directory() {
    let converters = load_converters_from_dir(&symbol_sets(), "test_data").unwrap();
    assert_eq!(converters.len(), 1);
    let converter = &converters[0];
    assert_eq!(converter.name(), "enusampa_svsampa");
    assert_eq!(converter.from().name(), "en-us_ws-sampa");
    assert_eq!(converter.to().name(), "sv-se_ws-sampa");
    assert_eq!(converter.rules().len(), 20);
}

#[rstest]
#[case("T i s", "t I s")]
#[case("D i s", "d I s")]
#[case("' w I T . d r= @U", "\" v I t . d @ r u:")]
#[case("' tS EI n dZ", "\" t rs e j n d j")]
#[case("s i T", "s I t")]
fn english_to_swedish(#[case] input: &str, #[case] expected: &str) {
    let converters = load_converters_from_dir(&symbol_sets(), "test_data").unwrap();
    assert_eq!(converters[0].convert(input).unwrap(), expected);
}

#[test]
fn output_outside_the_target_set_is_rejected() {
    let converters = load_converters_from_dir(&symbol_sets(), "test_data").unwrap();
    match converters[0].convert("T i x") {
        Err(Error::InvalidOutputSymbol { output, symbols }) => {
            assert_eq!(output, "t I x");
            assert_eq!(symbols, vec!["x"]);
        }
        other => panic!("expected invalid output, got {:?}", other),
    }
}

#[test]
fn a_missing_symbol_rule_is_named() {
    let text = fs::read_to_string("test_data/enusampa_svsampa.cnv")
        .unwrap()
        .replace("SYMBOL\tw\tv\n", "");
    match parse_converter("partial", &text, &symbol_sets()) {
        Err(Error::SelfTestFailure { name, failures }) => {
            assert_eq!(name, "partial");
            assert!(
                failures
                    .iter()
                    .any(|f| f == "symbol rule needed for input symbol /w/"),
                "{:?}",
                failures
            );
        }
        other => panic!("expected self test failure, got {:?}", other.map(|c| c.name().to_string())),
    }
}

#[test]
fn a_failing_example_is_reported() {
    let text = fs::read_to_string("test_data/enusampa_svsampa.cnv").unwrap()
        + "TEST\tT i s\tt i s\n";
    match parse_converter("bad_example", &text, &symbol_sets()) {
        Err(Error::SelfTestFailure { failures, .. }) => {
            assert_eq!(failures, vec!["from /T i s/ expected /t i s/, but got /t I s/"]);
        }
        other => panic!("expected self test failure, got {:?}", other.map(|c| c.name().to_string())),
    }
}

#[test]
fn references_to_unknown_sets_fail() {
    let text = "FROM\ten-us_ws-sampa\nTO\tde-de_ws-sampa\n";
    assert!(matches!(
        parse_converter("en_de", text, &symbol_sets()),
        Err(Error::UnknownSymbolSet(name)) if name == "de-de_ws-sampa"
    ));
}
