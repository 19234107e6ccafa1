//! # Pattern Registry
//!
//! Every pattern compiled during one configuration load, in compile order.
//! The registry is consumed, once, by [`optimize_all`](crate::optimizer::optimize_all).

use std::sync::Arc;

use crate::{
    engine::RegexEngine,
    errors::{RegexError, RxResult},
    pattern::CompiledPattern,
};

/// One registered pattern.
pub struct RegistryEntry<E: RegexEngine> {
    /// The compiled pattern.
    pub regex: Arc<CompiledPattern<E>>,

    /// The pattern source; kept for diagnostics only.
    pub name: Arc<str>,
}

impl<E: RegexEngine> RegistryEntry<E> {
    /// Build an entry for a compiled pattern.
    pub fn new(regex: Arc<CompiledPattern<E>>) -> Self {
        let name = regex.source_handle();
        Self { regex, name }
    }
}

impl<E: RegexEngine> Clone for RegistryEntry<E> {
    fn clone(&self) -> Self {
        Self {
            regex: self.regex.clone(),
            name: self.name.clone(),
        }
    }
}

impl<E: RegexEngine> core::fmt::Debug for RegistryEntry<E> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "RegistryEntry({:?})", self.name)
    }
}

/// Append-only list of patterns compiled for one generation.
pub struct PatternRegistry<E: RegexEngine> {
    entries: Vec<RegistryEntry<E>>,
}

impl<E: RegexEngine> Default for PatternRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RegexEngine> core::fmt::Debug for PatternRegistry<E> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<E: RegexEngine> PatternRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a pattern.
    ///
    /// ## Errors
    /// [`RegexError::NoMemory`] if the registry cannot grow.
    pub fn push(
        &mut self,
        regex: Arc<CompiledPattern<E>>,
    ) -> RxResult<()> {
        if self.entries.try_reserve(1).is_err() {
            return Err(RegexError::NoMemory {
                pattern: regex.source().to_string(),
            });
        }
        self.entries.push(RegistryEntry::new(regex));
        Ok(())
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the entries, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry<E>> {
        self.entries.iter()
    }

    /// Take the entries out of the registry.
    pub fn into_entries(self) -> Vec<RegistryEntry<E>> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedEngine;

    fn pattern(
        engine: &Arc<ScriptedEngine>,
        text: &str,
    ) -> Arc<CompiledPattern<ScriptedEngine>> {
        let code = engine
            .compile(&text.into(), Default::default())
            .unwrap();
        Arc::new(CompiledPattern::new(
            engine.clone(),
            code,
            text.into(),
            0,
            None,
        ))
    }

    #[test]
    fn test_push_in_order() {
        let engine = Arc::new(ScriptedEngine::new());
        let mut registry = PatternRegistry::new();
        assert!(registry.is_empty());

        for text in ["a", "b", "c"] {
            registry.push(pattern(&engine, text)).unwrap();
        }

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.iter().map(|e| &*e.name).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_entries_release_with_registry() {
        let engine = Arc::new(ScriptedEngine::new());
        let mut registry = PatternRegistry::new();
        registry.push(pattern(&engine, "a")).unwrap();
        registry.push(pattern(&engine, "b")).unwrap();

        assert_eq!(engine.released(), 0);
        drop(registry);
        assert_eq!(engine.released(), 2);
    }
}
