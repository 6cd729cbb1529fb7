//! Accent and stress placement filters.
//!
//! IPA puts stress marks in front of the syllable and the Swedish/Norwegian
//! tone accent (grave, U+0300) after the syllable nucleus. Native symbol sets
//! usually put both in front of the syllable, and CMU appends the stress digit
//! to the vowel. These rewrites move the marks between the two conventions
//! around the symbol-by-symbol mapping.

use super::matchers::{Matchers, Subset};
use super::symbol::Kind;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

pub const IPA_ACCENT_I: &str = "\u{02C8}";
pub const IPA_ACCENT_II: &str = "\u{0300}";
pub const IPA_SECONDARY_STRESS: &str = "\u{02CC}";
pub const IPA_LENGTH: &str = "\u{02D0}";

static CMU_STRESS_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new("([^ ]+)([012])").expect("constant pattern"));

fn compile(pattern: String) -> Result<Regex> {
    Regex::new(&pattern).map_err(|e| Error::pattern(&pattern, e))
}

/// Post-filter patterns that only apply to sets with a syllable delimiter.
#[derive(Debug, Clone)]
struct SyllableFilters {
    stress_after_nucleus: Regex,
    stress_inside_onset: Regex,
    accent_ii_onset: Regex,
}

/// Compiled filters for one symbol set.
#[derive(Debug, Clone)]
pub struct Filters {
    ipa_accent_ii: Regex,
    syllables: Option<SyllableFilters>,
    cmu_stress_prefix: Regex,
}

impl Filters {
    pub fn build(matchers: &Matchers, has_syllable_delimiter: bool) -> Result<Self> {
        let phonemes = matchers.ipa(Subset::Phonemes).pattern();
        let syllabic = matchers.ipa(Subset::Syllabic).pattern();
        let non_syllabic = matchers.ipa(Subset::NonSyllabic).pattern();
        let stress = format!("[{}{}]", IPA_ACCENT_I, IPA_SECONDARY_STRESS);

        let ipa_accent_ii = compile(format!(
            "{}({}+){}",
            IPA_ACCENT_I, phonemes, IPA_ACCENT_II
        ))?;

        let syllables = if has_syllable_delimiter {
            Some(SyllableFilters {
                stress_after_nucleus: compile(format!(
                    "({}*)({})({})",
                    non_syllabic, syllabic, stress
                ))?,
                stress_inside_onset: compile(format!(
                    "({}*)({})({})",
                    non_syllabic, stress, syllabic
                ))?,
                accent_ii_onset: compile(format!(
                    "{}{}({}*)({})",
                    IPA_ACCENT_I, IPA_ACCENT_II, non_syllabic, syllabic
                ))?,
            })
        } else {
            None
        };

        let cmu_stress_prefix = compile(format!(
            "([012]) ((?:{} )*)({})",
            matchers.native(Subset::NonSyllabic).pattern(),
            matchers.native(Subset::Syllabic).pattern()
        ))?;

        Ok(Self {
            ipa_accent_ii,
            syllables,
            cmu_stress_prefix,
        })
    }

    /// Rewrite applied to input of the given kind before tokenizing.
    pub fn pre(&self, kind: Kind, trans: &str) -> String {
        match kind {
            Kind::Ipa => self.before_from_ipa(trans),
            Kind::Cmu => before_from_cmu(trans),
            Kind::Sampa | Kind::Other => trans.to_string(),
        }
    }

    /// Rewrite applied to joined output of the given kind.
    pub fn post(&self, kind: Kind, trans: &str) -> String {
        match kind {
            Kind::Ipa => self.after_to_ipa(trans),
            Kind::Cmu => self.after_to_cmu(trans),
            Kind::Sampa | Kind::Other => trans.to_string(),
        }
    }

    /// `ˈbɑ̀ː` becomes `ˈ̀bɑː`: the tone accent joins the stress mark.
    pub fn before_from_ipa(&self, trans: &str) -> String {
        let trans = trans.replace(
            &format!("{}{}", IPA_ACCENT_II, IPA_LENGTH),
            &format!("{}{}", IPA_LENGTH, IPA_ACCENT_II),
        );
        self.ipa_accent_ii
            .replace_all(&trans, format!("{}{}${{1}}", IPA_ACCENT_I, IPA_ACCENT_II))
            .into_owned()
    }

    /// Move stress in front of the syllable onset and the tone accent behind the nucleus.
    pub fn after_to_ipa(&self, trans: &str) -> String {
        let Some(filters) = &self.syllables else {
            return trans.to_string();
        };

        // ə.baʊˈt => ə.ˈbaʊt
        let trans = filters
            .stress_after_nucleus
            .replace_all(trans, "${3}${1}${2}");
        // ə.bˈaʊt => ə.ˈbaʊt
        let mut trans = filters
            .stress_inside_onset
            .replace_all(&trans, "${2}${1}${3}")
            .into_owned();

        // ˈ̀pa.pa => ˈpà.pa
        if trans.contains(&format!("{}{}", IPA_ACCENT_I, IPA_ACCENT_II)) {
            trans = filters
                .accent_ii_onset
                .replace_all(&trans, format!("{}${{1}}${{2}}{}", IPA_ACCENT_I, IPA_ACCENT_II))
                .into_owned();
        }
        trans.replace(
            &format!("{}{}", IPA_LENGTH, IPA_ACCENT_II),
            &format!("{}{}", IPA_ACCENT_II, IPA_LENGTH),
        )
    }

    /// `1 B AW T` becomes `B AW1 T`.
    pub fn after_to_cmu(&self, trans: &str) -> String {
        self.cmu_stress_prefix
            .replace_all(trans, "${2}${3}${1}")
            .replace(" 1", "1")
            .replace(" 2", "2")
            .replace(" 0", "0")
    }
}

/// `B AW1 T` becomes `B 1 AW T`, so the digit tokenizes as its own symbol.
pub fn before_from_cmu(trans: &str) -> String {
    CMU_STRESS_SUFFIX
        .replace_all(trans, "${2} ${1}")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolset::symbol::{Category, IpaSymbol, Symbol};

    fn sym(text: &str, category: Category, ipa: &str) -> Symbol {
        Symbol::new(text, category, "", IpaSymbol::new(ipa))
    }

    fn swedish() -> Vec<Symbol> {
        vec![
            sym("a", Category::Syllabic, "a"),
            sym("A:", Category::Syllabic, "ɑː"),
            sym("b", Category::NonSyllabic, "b"),
            sym("r", Category::NonSyllabic, "r"),
            sym("k", Category::NonSyllabic, "k"),
            sym("\"", Category::Stress, "ˈ"),
            sym("\"\"", Category::Stress, "ˈ̀"),
            sym("%", Category::Stress, "ˌ"),
            sym("", Category::PhonemeDelimiter, ""),
            sym("$", Category::SyllableDelimiter, "."),
        ]
    }

    fn filters(symbols: &[Symbol], syllables: bool) -> Filters {
        Filters::build(&Matchers::build(symbols).unwrap(), syllables).unwrap()
    }

    #[test]
    fn accent_ii_moves_behind_the_nucleus() {
        let f = filters(&swedish(), true);
        assert_eq!(f.after_to_ipa("ˈ̀brɑː.ka"), "ˈbrɑ̀ː.ka");
    }

    #[test]
    fn accent_ii_moves_back_before_tokenizing() {
        let f = filters(&swedish(), true);
        assert_eq!(f.before_from_ipa("ˈbrɑ̀ː.ka"), "ˈ̀brɑː.ka");
    }

    #[test]
    fn stress_moves_to_syllable_onset() {
        let f = filters(&swedish(), true);
        assert_eq!(f.after_to_ipa("bɑːˈ.ka"), "ˈbɑː.ka");
        assert_eq!(f.after_to_ipa("a.bakˈa"), "a.baˈka");
        assert_eq!(f.after_to_ipa("a.brˈa"), "a.ˈbra");
    }

    #[test]
    fn without_syllable_delimiter_ipa_output_is_untouched() {
        let f = filters(&swedish(), false);
        assert_eq!(f.after_to_ipa("ˈ̀brɑː.ka"), "ˈ̀brɑː.ka");
    }

    #[test]
    fn cmu_stress_digits() {
        assert_eq!(before_from_cmu("AX $ B AW1 T"), "AX $ B 1 AW T");

        let cmu = vec![
            sym("AX", Category::Syllabic, "ə"),
            sym("AW", Category::Syllabic, "a⁀ʊ"),
            sym("B", Category::NonSyllabic, "b"),
            sym("T", Category::NonSyllabic, "t"),
            sym("1", Category::Stress, "ˈ"),
            sym(" ", Category::PhonemeDelimiter, ""),
            sym("$", Category::SyllableDelimiter, "."),
        ];
        let f = filters(&cmu, true);
        assert_eq!(f.after_to_cmu("AX $ 1 B AW T"), "AX $ B AW1 T");
    }
}
