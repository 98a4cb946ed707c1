use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    Api, ResourceExt,
    api::{ListParams, PostParams},
};
use snafu::ResultExt;

use crate::reconciler::{Error, error};

/// Access to the deployments a monitor inspects.
pub trait DeploymentStore {
    /// Lists every deployment visible to the operator, across namespaces.
    fn list_deployments(&self) -> impl Future<Output = Result<Vec<Deployment>, Error>> + Send;

    /// Writes `deployment` back, replacing the stored object.
    fn replace_deployment(
        &self,
        deployment: &Deployment,
    ) -> impl Future<Output = Result<Deployment, Error>> + Send;
}

impl DeploymentStore for kube::Client {
    async fn list_deployments(&self) -> Result<Vec<Deployment>, Error> {
        Api::<Deployment>::all(self.clone())
            .list(&ListParams::default())
            .await
            .map(|list| list.items)
            .context(error::ListDeploymentsSnafu)
    }

    async fn replace_deployment(&self, deployment: &Deployment) -> Result<Deployment, Error> {
        let namespace = deployment.namespace().unwrap_or_default();
        let name = deployment.name_any();
        Api::<Deployment>::namespaced(self.clone(), &namespace)
            .replace(&name, &PostParams::default(), deployment)
            .await
            .context(error::UpdateDeploymentSnafu { namespace, name })
    }
}
