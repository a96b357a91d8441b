//! Registry of controls grouped by framework, with runtime registration for
//! controls beyond the built-in packs (`spec.md` §4.4).

use std::collections::HashMap;
use std::sync::Arc;

use crate::control::Control;
use crate::controls;

#[derive(Default)]
pub struct ControlRegistry {
    by_framework: HashMap<String, Vec<Arc<dyn Control>>>,
}

impl ControlRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every built-in control pack.
    #[must_use]
    pub fn with_builtin_controls() -> Self {
        let mut registry = Self::new();
        for control in controls::soc2::controls() {
            registry.register(control);
        }
        for control in controls::hipaa::controls() {
            registry.register(control);
        }
        for control in controls::pci_dss::controls() {
            registry.register(control);
        }
        for control in controls::iso27001::controls() {
            registry.register(control);
        }
        for control in controls::cis::controls() {
            registry.register(control);
        }
        for control in controls::nist_800_53::controls() {
            registry.register(control);
        }
        registry
    }

    pub fn register(&mut self, control: Arc<dyn Control>) {
        self.by_framework.entry(control.framework().to_string()).or_default().push(control);
    }

    #[must_use]
    pub fn frameworks(&self) -> Vec<&str> {
        self.by_framework.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn controls_for(&self, framework: &str) -> &[Arc<dyn Control>] {
        self.by_framework.get(framework).map_or(&[], Vec::as_slice)
    }
}
