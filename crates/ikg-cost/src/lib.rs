//! Cost attribution: aggregate monthly cost across a subgraph, a filter, or
//! a provider/resource-type group (`spec.md` §2).

pub mod attribution;
pub mod error;

pub use attribution::{attribute_cost, attribute_cost_for_filter, CostAttribution};
pub use error::{Error, Result};
