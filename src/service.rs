//! Caller-owned registry of loaded symbol sets, mappers and converters.
//!
//! [`Registry`] is plain owned data. Mappers are created on first use and
//! cached under their `"<from> - <to>"` name; deleting a symbol set drops every
//! mapper and converter built on it. [`SharedRegistry`] puts a registry behind
//! an `RwLock` for use from several threads.

use crate::converter::{load_converters_from_dir, Converter};
use crate::error::{Error, Result};
use crate::mapper::{mapper_name, Mapper};
use crate::symbolset::{load_symbol_set, load_symbol_sets_from_dir, SymbolSet};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Pseudo symbol set name meaning "canonical IPA" in [`Registry::map`].
pub const IPA: &str = "ipa";

fn sorted_names<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}

#[derive(Debug, Default)]
pub struct Registry {
    symbol_sets: HashMap<String, Arc<SymbolSet>>,
    mappers: HashMap<String, Arc<Mapper>>,
    converters: HashMap<String, Arc<Converter>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol set, replacing any set of the same name along with the
    /// mappers and converters built on it.
    pub fn insert_symbol_set(&mut self, set: SymbolSet) -> Arc<SymbolSet> {
        let name = set.name().to_string();
        if self.symbol_sets.contains_key(&name) {
            self.drop_dependents(&name);
            tracing::info!(name = %name, "replacing symbol set");
        }
        let set = Arc::new(set);
        self.symbol_sets.insert(name, set.clone());
        set
    }

    pub fn load_symbol_set(&mut self, path: impl AsRef<Path>) -> Result<Arc<SymbolSet>> {
        let set = load_symbol_set(path)?;
        Ok(self.insert_symbol_set(set))
    }

    /// Load every symbol set in `dir`. Nothing is added if any file fails.
    pub fn load_symbol_set_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let sets = load_symbol_sets_from_dir(dir)?;
        let count = sets.len();
        for set in sets {
            self.insert_symbol_set(set);
        }
        Ok(count)
    }

    pub fn insert_converter(&mut self, converter: Converter) -> Arc<Converter> {
        let converter = Arc::new(converter);
        self.converters
            .insert(converter.name().to_string(), converter.clone());
        converter
    }

    /// Load every converter in `dir` against the symbol sets already loaded.
    /// Nothing is added if any file fails.
    pub fn load_converter_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let converters = load_converters_from_dir(&self.symbol_sets, dir)?;
        let count = converters.len();
        for converter in converters {
            self.insert_converter(converter);
        }
        Ok(count)
    }

    pub fn symbol_set(&self, name: &str) -> Result<Arc<SymbolSet>> {
        self.symbol_sets
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownSymbolSet(name.to_string()))
    }

    pub fn converter(&self, name: &str) -> Result<Arc<Converter>> {
        self.converters
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownConverter(name.to_string()))
    }

    /// A mapper that has already been created, if any.
    pub fn cached_mapper(&self, from: &str, to: &str) -> Option<Arc<Mapper>> {
        self.mappers.get(&mapper_name(from, to)).cloned()
    }

    pub fn symbol_set_names(&self) -> Vec<String> {
        sorted_names(&self.symbol_sets)
    }

    pub fn mapper_names(&self) -> Vec<String> {
        sorted_names(&self.mappers)
    }

    pub fn converter_names(&self) -> Vec<String> {
        sorted_names(&self.converters)
    }

    /// Remove a symbol set and every mapper and converter that uses it.
    pub fn delete_symbol_set(&mut self, name: &str) -> Result<()> {
        if self.symbol_sets.remove(name).is_none() {
            return Err(Error::UnknownSymbolSet(name.to_string()));
        }
        self.drop_dependents(name);
        tracing::info!(name = %name, "deleted symbol set");
        Ok(())
    }

    /// Forget a cached mapper. Returns whether there was one.
    pub fn delete_mapper(&mut self, from: &str, to: &str) -> bool {
        self.mappers.remove(&mapper_name(from, to)).is_some()
    }

    pub fn clear(&mut self) {
        self.symbol_sets.clear();
        self.mappers.clear();
        self.converters.clear();
    }

    fn drop_dependents(&mut self, set_name: &str) {
        self.mappers.retain(|_, mapper| !mapper.uses(set_name));
        self.converters
            .retain(|_, converter| !converter.uses(set_name));
    }

    /// Build a mapper without touching the cache.
    fn build_mapper(&self, from: &str, to: &str) -> Result<Mapper> {
        Mapper::new(self.symbol_set(from)?, self.symbol_set(to)?)
    }

    /// Cache a mapper built outside the write lock. If either of its sets
    /// was replaced or deleted meanwhile, rebuild from the current sets.
    fn cache_mapper(&mut self, mapper: Arc<Mapper>) -> Result<Arc<Mapper>> {
        if let Some(cached) = self.mappers.get(mapper.name()) {
            return Ok(cached.clone());
        }
        let current = |set: &Arc<SymbolSet>| {
            self.symbol_sets
                .get(set.name())
                .is_some_and(|known| Arc::ptr_eq(known, set))
        };
        if !(current(mapper.from()) && current(mapper.to())) {
            tracing::debug!(name = %mapper.name(), "symbol set replaced during build; rebuilding mapper");
            return self.get_or_create_mapper(mapper.from().name(), mapper.to().name());
        }
        self.mappers
            .insert(mapper.name().to_string(), mapper.clone());
        Ok(mapper)
    }

    pub fn get_or_create_mapper(&mut self, from: &str, to: &str) -> Result<Arc<Mapper>> {
        if let Some(mapper) = self.cached_mapper(from, to) {
            return Ok(mapper);
        }
        let mapper = Arc::new(self.build_mapper(from, to)?);
        self.mappers
            .insert(mapper.name().to_string(), mapper.clone());
        Ok(mapper)
    }

    /// Conversions that go straight through one symbol set, when either side
    /// is [`IPA`].
    fn map_through_ipa(&self, from: &str, to: &str, input: &str) -> Option<Result<String>> {
        match (from, to) {
            (IPA, IPA) => Some(Ok(input.to_string())),
            (IPA, to) => Some(
                self.symbol_set(to)
                    .and_then(|set| set.convert_from_ipa(input)),
            ),
            (from, IPA) => Some(
                self.symbol_set(from)
                    .and_then(|set| set.convert_to_ipa(input)),
            ),
            _ => None,
        }
    }

    /// Map a transcription between two symbol sets, creating the mapper on
    /// first use. Either name may be [`IPA`].
    pub fn map(&mut self, from: &str, to: &str, input: &str) -> Result<String> {
        if let Some(result) = self.map_through_ipa(from, to, input) {
            return result;
        }
        self.get_or_create_mapper(from, to)?
            .map_transcription(input)
    }

    pub fn convert(&self, converter: &str, input: &str) -> Result<String> {
        self.converter(converter)?.convert(input)
    }
}

/// A [`Registry`] shared between threads.
///
/// Lookups and conversions take the read lock. The write lock is only taken
/// to cache a newly built mapper or through [`SharedRegistry::write`].
#[derive(Debug, Default)]
pub struct SharedRegistry {
    inner: RwLock<Registry>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: RwLock::new(registry),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn map(&self, from: &str, to: &str, input: &str) -> Result<String> {
        let (mapper, cached) = {
            let registry = self.read();
            if let Some(result) = registry.map_through_ipa(from, to, input) {
                return result;
            }
            match registry.cached_mapper(from, to) {
                Some(mapper) => (mapper, true),
                None => (Arc::new(registry.build_mapper(from, to)?), false),
            }
        };
        let mapper = if cached {
            mapper
        } else {
            self.write().cache_mapper(mapper)?
        };
        mapper.map_transcription(input)
    }

    pub fn convert(&self, converter: &str, input: &str) -> Result<String> {
        let converter = self.read().converter(converter)?;
        converter.convert(input)
    }
}
