//! Locates and describes neutron-scattering data on the instrument's shared
//! filesystem.
//!
//! Raw acquisition files and the outputs of the external reduction workflow
//! follow a fixed directory convention (see [`DataLayout`]). This crate
//! resolves paths under that convention, walks the reduction tree to list
//! what has been reduced ([`ReductionDiscoverer`]), and reads run metadata
//! from raw files ([`RunMetadataResolver`]). Everything here is read-only and
//! synchronous; every call re-walks the tree.

pub mod config;
pub mod discovery;
pub mod display;
mod error;
mod ids;
pub mod layout;
mod model;
mod resolve;

pub use config::Config;
pub use config::ConfigOverrides;
pub use discovery::ReductionDiscoverer;
pub use discovery::RunFilter;
pub use error::DataError;
pub use error::Result;
pub use ids::DataMode;
pub use ids::ExperimentId;
pub use ids::StateId;
pub use layout::DataLayout;
pub use model::ReducedRun;
pub use model::RunMetadata;
pub use model::StateInfo;
pub use resolve::RunMetadataResolver;
