use phonomap::{Error, Mapper};
use rstest::rstest;

const NST: &str = "test_data/nb-no_nst-xsampa.sym";
const NB_WS: &str = "test_data/nb-no_ws-sampa.sym";
const CMU: &str = "test_data/en-us_cmu.sym";
const CMU_NO_SYLLABLES: &str = "test_data/en-us_cmu-nosylldelim.sym";
const EN_WS: &str = "test_data/en-us_ws-sampa.sym";

#[rstest]
#[case("\"A:$bl@s", "\" A: . b l @ s")]
#[case("\"tSE$kIsk", "\" t S e . k i s k")]
#[case("\"\"b9$n@r", "\"\" b 2 . n @ r")]
#[case("\"b9$n@r", "\" b 2 . n @ r")]
#[case("b\"9n", "\" b 2 n")]
fn norwegian_nst_to_ws(#[case] input: &str, #[case] expected: &str) {
    let mapper = Mapper::from_files("SAMPA", "SYMBOL", NST, NB_WS).unwrap();
    assert_eq!(mapper.name(), "SAMPA - SYMBOL");
    assert_eq!(mapper.map_transcription(input).unwrap(), expected);
}

#[test]
fn cmu_without_syllables_to_ws() {
    let mapper = Mapper::from_files("ENU-CMU", "ENU-WS", CMU_NO_SYLLABLES, EN_WS).unwrap();
    assert_eq!(
        mapper.map_transcription("P L AE1 T AX P UH2 S").unwrap(),
        "p l ' { t @ p % U s"
    );
}

#[test]
fn cmu_with_syllables_to_ws() {
    let mapper = Mapper::from_files("ENU-CMU", "ENU-WS", CMU, EN_WS).unwrap();
    assert_eq!(
        mapper.map_transcription("P L AE1 $ T AX $ P UH2 S").unwrap(),
        "' p l { . t @ . % p U s"
    );
}

#[test]
fn sets_must_differ_in_name_and_file() {
    assert!(matches!(
        Mapper::from_files("SAMPA", "SAMPA", NST, NB_WS),
        Err(Error::MalformedDefinition { .. })
    ));
    assert!(matches!(
        Mapper::from_files("XSAMPA", "SAMPA", NST, NST),
        Err(Error::MalformedDefinition { .. })
    ));
}

#[test]
fn unmappable_symbols_fail_construction() {
    // English has no tone accent, so Norwegian accent II can't map
    match Mapper::from_files("nst", "en", NST, EN_WS) {
        Err(Error::SelfTestFailure { name, failures }) => {
            assert_eq!(name, "nst - en");
            assert!(failures.iter().any(|f| f.starts_with("/\"\"/")), "{:?}", failures);
        }
        other => panic!("expected self test failure, got {:?}", other.map(|m| m.name().to_string())),
    }
}

#[test]
fn unknown_input_is_tagged_with_the_stage() {
    let mapper = Mapper::from_files("ENU-CMU", "ENU-WS", CMU, EN_WS).unwrap();
    let err = mapper.map_transcription("P L AE1 QQ").unwrap_err();
    let report = err.report();
    assert_eq!(report.error_code, 25);
    assert_eq!(report.values, vec!["QQ"]);
    insta::assert_snapshot!(err.to_string(), @"couldn't map transcription (to ipa): unknown input symbol(s): QQ");
}
