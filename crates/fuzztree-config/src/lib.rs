//! Configuration space of a variability fault tree.
//!
//! [`ConfigurationSpaceGenerator`] enumerates every resolution of the
//! template's variation points as an ordered list of [`Configuration`]s;
//! [`TreeInstantiator`] turns the template and one configuration into a
//! variability-free tree ready for analysis.

pub mod configuration;
pub mod cost;
pub mod error;
pub mod formula;
pub mod generator;
pub mod ids;
pub mod instantiate;

pub use configuration::{Configuration, ConfigurationId, KOutOfN};
pub use cost::configuration_cost;
pub use error::{FormulaError, StructuralError};
pub use formula::Formula;
pub use generator::ConfigurationSpaceGenerator;
pub use ids::IdGenerator;
pub use instantiate::TreeInstantiator;
