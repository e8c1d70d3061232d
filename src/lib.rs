//! cliforge — vendor-neutral network device configuration synthesis.
//!
//! A typed configuration model is compiled per feature into CLI text for
//! Cisco IOS, Huawei VRP and H3C Comware dialects. The aggregator stitches
//! per-feature output into one deployable script; the scheduler recompiles
//! features incrementally as the model is edited.

pub mod aggregate;
pub mod applicability;
pub mod compile;
pub mod config;
pub mod dialect;
pub mod model;
pub mod scheduler;

pub use aggregate::compile_all;
pub use applicability::Feature;
pub use compile::{compile_feature, FeatureOutput};
pub use dialect::Dialect;
pub use scheduler::BuildScheduler;
