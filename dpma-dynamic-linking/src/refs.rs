//! Search hints for modules bundled several dependency levels deep.
//!
//! A reference chain spec has the form
//! `<module_id>=<l1_module>,<l2_module>,...;<module_id>=...` and is usually
//! supplied through `DPMA_REFS`. Each chain becomes one nested
//! `node_modules/<l1>/node_modules/<l2>/...` hint, appended after the
//! caller's explicit hints.

use std::{collections::HashMap, path::PathBuf};

use log::debug;

use crate::host::{HostEnvironment, REFS_ENV_VAR};

const DEPENDENCY_DIR: &str = "node_modules";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceChains {
    chains: HashMap<String, Vec<String>>,
}

impl ReferenceChains {
    /// Entries without exactly one `=` are skipped.
    pub fn parse(spec: &str) -> Self {
        let mut chains = HashMap::new();
        for entry in spec.split(';') {
            let parts: Vec<&str> = entry.split('=').collect();
            let [module_id, chain] = parts.as_slice() else {
                if !entry.is_empty() {
                    debug!("Skipping malformed reference chain entry '{}'", entry);
                }
                continue;
            };
            let chain = chain.split(',').map(str::to_string).collect();
            chains.insert(module_id.to_string(), chain);
        }
        Self { chains }
    }

    pub fn from_host(host: &impl HostEnvironment) -> Self {
        host.var(REFS_ENV_VAR)
            .map(|spec| Self::parse(&spec))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn chain(&self, module_id: &str) -> Option<&[String]> {
        self.chains.get(module_id).map(Vec::as_slice)
    }

    pub fn hint_for(&self, module_id: &str) -> Option<PathBuf> {
        let chain = self.chain(module_id)?;
        let mut hint = PathBuf::new();
        for module in chain.iter().filter(|module| !module.is_empty()) {
            hint.push(DEPENDENCY_DIR);
            hint.push(module);
        }
        if hint.as_os_str().is_empty() {
            None
        } else {
            Some(hint)
        }
    }
}
