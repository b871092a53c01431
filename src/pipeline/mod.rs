//! Pipeline entry points for the local dev environment.
//!
//! - `run_wait`: Poll RabbitMQ and LocalStack until they accept requests
//! - `run_provision`: Create bucket, function, permission and notification
//! - `run_bootstrap`: Both of the above, in that order

pub mod bootstrap;
pub mod provision;

pub use bootstrap::{default_probes, run_bootstrap, run_local_bootstrap, run_wait};
pub use provision::{ProvisionReport, run_provision};
