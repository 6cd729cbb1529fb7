//! Property-based tests for transcription splitting and IPA conversion.

use phonomap::symbolset::tokenizer::LongestMatch;
use phonomap::symbolset::{load_symbol_set, Category, Subset, SymbolSet};
use once_cell::sync::Lazy;
use proptest::prelude::*;

static SWEDISH: Lazy<SymbolSet> =
    Lazy::new(|| load_symbol_set("test_data/sv-se_ws-sampa.sym").expect("swedish symbol set"));

fn swedish() -> &'static SymbolSet {
    &SWEDISH
}

/// Phonemes whose IPA reads back unchanged in any sequence. `a U` would come
/// back as the diphthong `au`.
fn unambiguous_phonemes() -> Vec<String> {
    swedish()
        .subset(Subset::Phonemes)
        .filter(|s| s.category != Category::Stress && s.text != "au" && s.text != "U")
        .map(|s| s.text.clone())
        .collect()
}

const ALPHABET: [&str; 5] = ["a", "aa", "b", "bb", "ab"];

fn splitter(prune: bool) -> LongestMatch {
    LongestMatch::new(ALPHABET.iter().map(|s| (*s, Category::NonSyllabic)))
        .unwrap()
        .with_pruning(prune)
}

proptest! {
    #[test]
    fn pruning_never_changes_the_split(input in "[abx]{0,24}") {
        prop_assert_eq!(splitter(true).split(&input), splitter(false).split(&input));
    }

    #[test]
    fn split_tokens_reassemble_the_input(input in "[abxé]{0,24}") {
        let split = splitter(true).split(&input);
        prop_assert_eq!(split.tokens.concat(), input);
        for unknown in &split.unknown {
            prop_assert_eq!(unknown.chars().count(), 1);
        }
    }

    #[test]
    fn first_token_is_the_longest_known_prefix(input in "[ab]{1,24}") {
        let split = splitter(true).split(&input);
        let longest = ALPHABET
            .iter()
            .filter(|s| input.starts_with(**s))
            .map(|s| s.len())
            .max()
            .unwrap_or(0);
        prop_assert_eq!(split.tokens[0].len(), longest);
    }

    #[test]
    fn delimited_split_returns_the_joined_symbols(
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..12),
        gaps in prop::collection::vec(1usize..4, 12),
    ) {
        let phonemes = unambiguous_phonemes();
        let tokens: Vec<String> = picks.iter().map(|i| phonemes[i.index(phonemes.len())].clone()).collect();
        let mut input = String::new();
        for (token, gap) in tokens.iter().zip(&gaps) {
            input.push_str(token);
            input.push_str(&" ".repeat(*gap));
        }
        prop_assert_eq!(swedish().split_transcription(&input).unwrap(), tokens);
    }

    #[test]
    fn ipa_round_trip_restores_the_transcription(
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..12),
    ) {
        let phonemes = unambiguous_phonemes();
        let tokens: Vec<&str> = picks.iter().map(|i| phonemes[i.index(phonemes.len())].as_str()).collect();
        let input = tokens.join(" ");
        let ipa = swedish().convert_to_ipa(&input).unwrap();
        prop_assert_eq!(swedish().convert_from_ipa(&ipa).unwrap(), input);
    }
}
