//! Adapter registry: a map from provider tag to adapter value, not an
//! inheritance hierarchy (`spec.md` §9 "object-oriented provider hierarchies
//! → capability records"). Grounded on the secrets crate's resolver
//! registry in the teacher codebase.

use std::collections::HashMap;
use std::sync::Arc;

use ikg_core::Provider;

use crate::adapter::Adapter;

/// Registry of discovery adapters keyed by the provider they serve. At most
/// one adapter may be registered per provider; registering again replaces
/// the previous one.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<Provider, Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    #[must_use]
    pub fn get(&self, provider: Provider) -> Option<Arc<dyn Adapter>> {
        self.adapters.get(&provider).cloned()
    }

    #[must_use]
    pub fn has(&self, provider: Provider) -> bool {
        self.adapters.contains_key(&provider)
    }

    #[must_use]
    pub fn providers(&self) -> Vec<Provider> {
        self.adapters.keys().copied().collect()
    }
}
