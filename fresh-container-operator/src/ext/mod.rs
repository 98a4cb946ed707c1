//! Extensions to Kubernetes API types.

mod deployment;

pub use self::deployment::DeploymentExt;
