use std::path::PathBuf;

use crate::{config::ResolverConfig, refs::ReferenceChains};

const DEFAULT_HINT: &str = ".";

/// What to load and where to look for it.
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    library_name: String,
    search_hints: Vec<PathBuf>,
    config: ResolverConfig,
}

impl ResolutionRequest {
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            search_hints: vec![PathBuf::from(DEFAULT_HINT)],
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the hint list. An empty list keeps the default `.` hint.
    pub fn with_hints<I, P>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let hints: Vec<PathBuf> = hints.into_iter().map(Into::into).collect();
        self.search_hints = if hints.is_empty() {
            vec![PathBuf::from(DEFAULT_HINT)]
        } else {
            hints
        };
        self
    }

    /// Appends the nested dependency hint for `module_id`, if it has a chain.
    pub fn with_reference_chain(mut self, chains: &ReferenceChains, module_id: &str) -> Self {
        if let Some(hint) = chains.hint_for(module_id) {
            self.search_hints.push(hint);
        }
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn search_hints(&self) -> &[PathBuf] {
        &self.search_hints
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}
