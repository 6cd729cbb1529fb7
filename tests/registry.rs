use phonomap::service::IPA;
use phonomap::{Error, Registry, SharedRegistry};
use std::sync::Arc;
use std::thread;

fn loaded() -> Registry {
    let mut registry = Registry::new();
    assert_eq!(registry.load_symbol_set_dir("test_data").unwrap(), 6);
    assert_eq!(registry.load_converter_dir("test_data").unwrap(), 1);
    registry
}

#[test]
fn maps_between_loaded_sets() {
    let mut registry = loaded();
    assert_eq!(
        registry
            .map("nb-no_nst-xsampa", "nb-no_ws-sampa", "\"\"b9$n@r")
            .unwrap(),
        "\"\" b 2 . n @ r"
    );
    assert_eq!(registry.mapper_names(), vec!["nb-no_nst-xsampa - nb-no_ws-sampa"]);
}

#[test]
fn ipa_is_available_on_either_side() {
    let mut registry = loaded();
    assert_eq!(registry.map("sv-se_ws-sampa", IPA, "\" b O rt").unwrap(), "ˈbɔʈ");
    assert_eq!(
        registry.map(IPA, "sv-se_ws-sampa", "be.ˈliːn").unwrap(),
        "b e . \" l i: n"
    );
}

#[test]
fn converts_with_loaded_converters() {
    let registry = loaded();
    assert_eq!(registry.converter_names(), vec!["enusampa_svsampa"]);
    assert_eq!(registry.convert("enusampa_svsampa", "T i s").unwrap(), "t I s");
}

#[test]
fn deleting_a_set_removes_dependents() {
    let mut registry = loaded();
    registry
        .get_or_create_mapper("en-us_cmu", "en-us_ws-sampa")
        .unwrap();
    registry.delete_symbol_set("en-us_ws-sampa").unwrap();

    assert!(registry.mapper_names().is_empty());
    assert!(registry.converter_names().is_empty());
    assert!(matches!(
        registry.map("en-us_cmu", "en-us_ws-sampa", "P AE1 T"),
        Err(Error::UnknownSymbolSet(_))
    ));
}

#[test]
fn reloading_a_set_drops_stale_mappers() {
    let mut registry = loaded();
    registry
        .get_or_create_mapper("en-us_cmu", "en-us_ws-sampa")
        .unwrap();
    registry
        .load_symbol_set("test_data/en-us_cmu.sym")
        .unwrap();
    assert!(registry.mapper_names().is_empty());
    assert_eq!(registry.symbol_set_names().len(), 6);
}

#[test]
fn shared_registry_serves_concurrent_readers() {
    let shared = Arc::new(SharedRegistry::new(loaded()));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                if i % 2 == 0 {
                    shared.map("en-us_cmu", "en-us_ws-sampa", "P L AE1 $ T AX $ P UH2 S")
                } else {
                    shared.convert("enusampa_svsampa", "D i s")
                }
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.join().unwrap().unwrap();
        let expected = if i % 2 == 0 { "' p l { . t @ . % p U s" } else { "d I s" };
        assert_eq!(output, expected);
    }
    assert_eq!(shared.read().mapper_names(), vec!["en-us_cmu - en-us_ws-sampa"]);
}
