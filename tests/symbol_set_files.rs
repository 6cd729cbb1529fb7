//! Symbol sets loaded from the definition files in `test_data/`.

use phonomap::symbolset::{load_symbol_set, load_symbol_sets_from_dir, Kind};
use phonomap::{Error, SymbolSet};
use rstest::rstest;
use std::fs;

fn swedish() -> SymbolSet {
    load_symbol_set("test_data/sv-se_ws-sampa.sym").expect("swedish symbol set")
}

#[test]
fn loads_every_set_in_the_directory() {
    let sets = load_symbol_sets_from_dir("test_data").unwrap();
    let names: Vec<&str> = sets.iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec![
            "en-us_cmu",
            "en-us_cmu-nosylldelim",
            "en-us_ws-sampa",
            "nb-no_nst-xsampa",
            "nb-no_ws-sampa",
            "sv-se_ws-sampa",
        ]
    );
    assert_eq!(sets[0].kind(), Kind::Cmu);
    assert_eq!(sets[5].kind(), Kind::Sampa);
    assert!(sets[3].is_delimiter_free());
    assert!(!sets[4].is_delimiter_free());
}

#[rstest]
#[case("\" b O rt", "ˈbɔʈ")]
#[case("\" k a j . r U", "ˈkaj.rʊ")]
#[case("b e . \" l i: n", "be.ˈliːn")]
#[case("\"\" b r A: . k a", "ˈbrɑ\u{0300}ː.ka")]
#[case("\"  b   O rt ", "ˈbɔʈ")]
fn swedish_to_ipa(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(swedish().convert_to_ipa(input).unwrap(), expected);
}

#[rstest]
#[case("ˈbɔʈ", "\" b O rt")]
#[case("ˈkaj.rʊ", "\" k a j . r U")]
#[case("be.ˈliːn", "b e . \" l i: n")]
#[case("ˈbrɑ\u{0300}ː.ka", "\"\" b r A: . k a")]
fn swedish_from_ipa(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(swedish().convert_from_ipa(input).unwrap(), expected);
}

#[test]
fn tone_accent_tokenizes_as_one_stress_symbol() {
    let tokens = swedish()
        .split_ipa_transcription("ˈbrɑ\u{0300}ː.ka")
        .unwrap();
    assert_eq!(tokens, vec!["ˈ\u{0300}", "b", "r", "ɑː", ".", "k", "a"]);
}

#[test]
fn unknown_symbols_are_all_reported() {
    match swedish().convert_to_ipa("\" x O q x") {
        Err(Error::UnknownInputSymbol(symbols)) => assert_eq!(symbols, vec!["x", "q"]),
        other => panic!("expected unknown input symbols, got {:?}", other),
    }
    match swedish().convert_from_ipa("ˈbɔʈθ") {
        Err(Error::UnknownInputSymbol(symbols)) => assert_eq!(symbols, vec!["θ"]),
        other => panic!("expected unknown input symbols, got {:?}", other),
    }
}

#[test]
fn delimiter_free_sets_split_greedily() {
    let nst = load_symbol_set("test_data/nb-no_nst-xsampa.sym").unwrap();
    assert_eq!(
        nst.split_transcription("\"\"b9$n@r").unwrap(),
        vec!["\"\"", "b", "9", "$", "n", "@", "r"]
    );
    assert_eq!(nst.convert_to_ipa("\"A:$bl@s").unwrap(), "ˈɑː.bləs");
}

#[test]
fn cmu_stress_digits_follow_the_vowel() {
    let cmu = load_symbol_set("test_data/en-us_cmu.sym").unwrap();
    assert_eq!(
        cmu.convert_to_ipa("P L AE1 $ T AX $ P UH2 S").unwrap(),
        "ˈplæ.tə.ˌpʊs"
    );
}

#[test]
fn a_broken_file_fails_the_directory_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy("test_data/sv-se_ws-sampa.sym", dir.path().join("sv.sym")).unwrap();
    fs::write(
        dir.path().join("broken.sym"),
        "DESCRIPTION\tSYMBOL\tIPA\tIPA UNICODE\tCATEGORY\nsil\tp\tp\tU+0070\tNonSyllabic\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a definition").unwrap();

    match load_symbol_sets_from_dir(dir.path()) {
        Err(Error::Load { failures, .. }) => {
            assert_eq!(failures.len(), 1);
            assert!(failures[0].contains("broken.sym"), "{}", failures[0]);
            assert!(failures[0].contains("no phoneme delimiter"), "{}", failures[0]);
        }
        other => panic!("expected load failure, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn failing_embedded_tests_prevent_loading() {
    let text = fs::read_to_string("test_data/sv-se_ws-sampa.sym").unwrap()
        + "TEST\tACCEPT\tSYMBOLS\t\" b O th\n";
    match phonomap::symbolset::parse_symbol_set("sv", &text) {
        Err(Error::SelfTestFailure { name, failures }) => {
            assert_eq!(name, "sv");
            assert_eq!(failures.len(), 1);
            assert!(failures[0].contains("'th'"), "{}", failures[0]);
        }
        other => panic!("expected self test failure, got {:?}", other.map(|s| s.name().to_string())),
    }
}
