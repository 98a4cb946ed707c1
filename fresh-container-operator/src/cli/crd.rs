use kube::CustomResourceExt;
use snafu::ResultExt;

use crate::{
    cli::error::{self, Error},
    crd::FreshContainerMonitor,
};

/// The `FreshContainerMonitor` CustomResourceDefinition as YAML.
///
/// # Errors
///
/// Fails when the definition cannot be serialized.
pub fn render() -> Result<String, Error> {
    serde_yaml::to_string(&FreshContainerMonitor::crd()).context(error::SerializeCrdSnafu)
}
