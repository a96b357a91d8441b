//! Built-in control packs. Rule bodies are data, not interface (`spec.md`
//! §4.4): each function returns a fresh `Vec` of closures over tags,
//! metadata, and incident relationship types.

pub mod cis;
pub mod hipaa;
pub mod iso27001;
pub mod nist_800_53;
pub mod pci_dss;
pub mod soc2;
