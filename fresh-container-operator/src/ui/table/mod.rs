//! Table renderings for the command line.

mod deployment_list_ext;
mod evaluation_ext;

pub use self::{deployment_list_ext::DeploymentListExt, evaluation_ext::ReadinessExt};
