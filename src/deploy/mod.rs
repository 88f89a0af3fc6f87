// ABOUTME: Deployment reconciliation: specs, descriptors, revisions, deployer.
// ABOUTME: Exports the Deployer state machine and its error taxonomy.

mod deployer;
mod descriptor;
mod error;
mod revision;
mod spec;

pub use deployer::Deployer;
pub use descriptor::{descriptors_match, desired_descriptor};
pub use error::DeployError;
pub use revision::DeploymentRevision;
pub use spec::{DeploySpec, SpecError};
