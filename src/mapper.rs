//! Mapping transcriptions between two symbol sets through IPA.
//!
//! A [`Mapper`] converts into IPA with its source set and back out of IPA
//! with its target set. Building one maps every symbol of the source set
//! once, so a mapper that exists can map every symbol it will ever see.

use crate::error::{Error, MapStage, Result};
use crate::symbolset::{load_symbol_set_with_name, Symbol, SymbolSet};
use std::path::Path;
use std::sync::Arc;

/// Name of the mapper between two symbol sets, as used by the registry.
pub fn mapper_name(from: &str, to: &str) -> String {
    format!("{} - {}", from, to)
}

#[derive(Debug, Clone)]
pub struct Mapper {
    name: String,
    from: Arc<SymbolSet>,
    to: Arc<SymbolSet>,
}

impl Mapper {
    /// Build a mapper and check that every non-empty source symbol maps.
    pub fn new(from: Arc<SymbolSet>, to: Arc<SymbolSet>) -> Result<Self> {
        let mapper = Self {
            name: mapper_name(from.name(), to.name()),
            from,
            to,
        };

        let failures: Vec<String> = mapper
            .from
            .symbols()
            .iter()
            .filter(|symbol| !symbol.text.is_empty())
            .filter_map(|symbol| {
                mapper
                    .map_transcription(&symbol.text)
                    .err()
                    .map(|err| format!("/{}/: {}", symbol.text, err))
            })
            .collect();
        if !failures.is_empty() {
            return Err(Error::SelfTestFailure {
                name: mapper.name,
                failures,
            });
        }

        tracing::debug!(name = %mapper.name, "built mapper");
        Ok(mapper)
    }

    /// Load both symbol sets from files under the given names and build a mapper.
    ///
    /// The two sets must differ in both name and file.
    pub fn from_files(
        from_name: &str,
        to_name: &str,
        from_path: impl AsRef<Path>,
        to_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let (from_path, to_path) = (from_path.as_ref(), to_path.as_ref());
        let name = mapper_name(from_name, to_name);
        if from_name == to_name {
            return Err(Error::malformed(
                name,
                format!("both symbol sets are named {}", from_name),
            ));
        }
        if from_path == to_path {
            return Err(Error::malformed(
                name,
                format!("both symbol sets are read from {}", from_path.display()),
            ));
        }
        let from = load_symbol_set_with_name(from_name, from_path)?;
        let to = load_symbol_set_with_name(to_name, to_path)?;
        Self::new(Arc::new(from), Arc::new(to))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from(&self) -> &Arc<SymbolSet> {
        &self.from
    }

    pub fn to(&self) -> &Arc<SymbolSet> {
        &self.to
    }

    /// Whether this mapper reads or writes the named symbol set.
    pub fn uses(&self, symbol_set: &str) -> bool {
        self.from.name() == symbol_set || self.to.name() == symbol_set
    }

    pub fn map_transcription(&self, input: &str) -> Result<String> {
        let ipa = self
            .from
            .convert_to_ipa(input)
            .map_err(|err| Error::Mapping {
                stage: MapStage::ToIpa,
                source: Box::new(err),
            })?;
        self.to
            .convert_from_ipa(&ipa)
            .map_err(|err| Error::Mapping {
                stage: MapStage::FromIpa,
                source: Box::new(err),
            })
    }

    /// Map each transcription in turn, stopping at the first failure.
    pub fn map_transcriptions<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<String>> {
        inputs
            .iter()
            .map(|input| self.map_transcription(input.as_ref()))
            .collect()
    }

    /// The target symbol with the same IPA as `symbol`.
    pub fn map_symbol(&self, symbol: &Symbol) -> Result<&Symbol> {
        self.to
            .get_from_ipa(&symbol.ipa.text)
            .ok_or_else(|| Error::UnknownInputSymbol(vec![symbol.ipa.text.clone()]))
    }

    /// Map one source symbol, given by its text, to the target symbol text.
    pub fn map_symbol_string(&self, text: &str) -> Result<String> {
        let symbol = self
            .from
            .get(text)
            .ok_or_else(|| Error::UnknownInputSymbol(vec![text.to_string()]))?;
        Ok(self.map_symbol(symbol)?.text.clone())
    }

    /// Source symbol text paired with its target symbol text, in source order.
    ///
    /// Symbols without a counterpart map to `None`.
    pub fn table(&self) -> Vec<(&Symbol, Option<&Symbol>)> {
        self.from
            .symbols()
            .iter()
            .map(|symbol| (symbol, self.map_symbol(symbol).ok()))
            .collect()
    }
}
