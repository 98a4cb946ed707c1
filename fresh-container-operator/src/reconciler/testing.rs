//! In-memory collaborators for exercising the reconciler.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use fresh_container_base::consts::k8s::annotations;
use k8s_openapi::api::{
    apps::v1::{Deployment, DeploymentSpec},
    core::v1::{Container, PodSpec, PodTemplateSpec},
};
use kube::{ResourceExt, api::ObjectMeta};
use reqwest::StatusCode;

use crate::{
    oracle::{self, EvalUpgradeResponse, ImageUpgradeEvaluation, Oracle},
    reconciler::{DeploymentStore, Error},
};

pub fn container(name: &str, image: &str) -> Container {
    Container { name: name.to_string(), image: Some(image.to_string()), ..Container::default() }
}

pub fn evaluation(image: &str, current: &str, next: &str, stale: bool) -> ImageUpgradeEvaluation {
    ImageUpgradeEvaluation {
        image: image.to_string(),
        constraint: "*".to_string(),
        current_version: current.to_string(),
        next_version: next.to_string(),
        stale,
    }
}

pub struct DeploymentBuilder {
    name: String,
    namespace: String,
    containers: Vec<Container>,
    annotations: BTreeMap<String, String>,
    labels: BTreeMap<String, String>,
    template_annotations: BTreeMap<String, String>,
}

impl DeploymentBuilder {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            containers: Vec::new(),
            annotations: BTreeMap::new(),
            labels: BTreeMap::new(),
            template_annotations: BTreeMap::new(),
        }
    }

    pub fn container(mut self, name: &str, image: &str) -> Self {
        self.containers.push(container(name, image));
        self
    }

    pub fn annotation(mut self, key: &str, value: &str) -> Self {
        let _prev = self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        let _prev = self.labels.insert(key.to_string(), value.to_string());
        self
    }

    /// Declares `constraint` for `container_name` on the pod template.
    pub fn constraint(self, container_name: &str, constraint: &str) -> Self {
        self.template_annotation(&annotations::constraint_key(container_name), constraint)
    }

    pub fn template_annotation(mut self, key: &str, value: &str) -> Self {
        let _prev = self.template_annotations.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> Deployment {
        let Self { name, namespace, containers, annotations, labels, template_annotations } = self;
        Deployment {
            metadata: ObjectMeta {
                name: Some(name),
                namespace: Some(namespace),
                annotations: (!annotations.is_empty()).then_some(annotations),
                labels: (!labels.is_empty()).then_some(labels),
                ..ObjectMeta::default()
            },
            spec: Some(DeploymentSpec {
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        annotations: (!template_annotations.is_empty())
                            .then_some(template_annotations),
                        ..ObjectMeta::default()
                    }),
                    spec: Some(PodSpec { containers, ..PodSpec::default() }),
                },
                ..DeploymentSpec::default()
            }),
            ..Deployment::default()
        }
    }
}

#[derive(Clone, Debug)]
pub enum OracleAnswer {
    Ready(ImageUpgradeEvaluation),
    Pending,
    Unclassifiable,
    TransportError,
}

impl OracleAnswer {
    pub fn stale(image: &str, current: &str, next: &str) -> Self {
        Self::Ready(evaluation(image, current, next, true))
    }

    pub fn fresh(image: &str, current: &str) -> Self {
        Self::Ready(evaluation(image, current, current, false))
    }
}

/// Answers from a fixed table keyed by image reference and records every
/// query. Unknown images are reported as up to date.
#[derive(Debug, Default)]
pub struct FakeOracle {
    answers: HashMap<String, OracleAnswer>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeOracle {
    pub fn answer(mut self, image: &str, answer: OracleAnswer) -> Self {
        let _prev = self.answers.insert(image.to_string(), answer);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> { self.calls.lock().unwrap().clone() }
}

impl Oracle for FakeOracle {
    async fn eval_upgrade(
        &self,
        image: &str,
        constraint: &str,
    ) -> Result<EvalUpgradeResponse, oracle::Error> {
        self.calls.lock().unwrap().push((image.to_string(), constraint.to_string()));

        let answer = self.answers.get(image).cloned().unwrap_or_else(|| {
            let (repository, tag) = image.rsplit_once(':').unwrap_or((image, "latest"));
            OracleAnswer::fresh(repository, tag)
        });

        match answer {
            OracleAnswer::Ready(mut evaluation) => {
                constraint.clone_into(&mut evaluation.constraint);
                Ok(EvalUpgradeResponse::new(
                    StatusCode::OK,
                    serde_json::to_vec(&evaluation).unwrap(),
                ))
            }
            OracleAnswer::Pending => Ok(EvalUpgradeResponse::new(StatusCode::ACCEPTED, Vec::new())),
            OracleAnswer::Unclassifiable => Ok(EvalUpgradeResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                b"registry unreachable".to_vec(),
            )),
            OracleAnswer::TransportError => {
                let source = reqwest::Client::new().get("not a url").build().unwrap_err();
                Err(oracle::Error::SendRequest {
                    image: image.to_string(),
                    constraint: constraint.to_string(),
                    source,
                })
            }
        }
    }
}

/// Keeps deployments in memory and records every replacement.
#[derive(Debug, Default)]
pub struct FakeStore {
    deployments: Vec<Deployment>,
    fail_list: bool,
    fail_replace: Vec<String>,
    replaced: Mutex<Vec<Deployment>>,
}

impl FakeStore {
    pub fn with(deployments: Vec<Deployment>) -> Self {
        Self { deployments, ..Self::default() }
    }

    pub fn failing_list() -> Self { Self { fail_list: true, ..Self::default() } }

    pub fn fail_replace(mut self, name: &str) -> Self {
        self.fail_replace.push(name.to_string());
        self
    }

    pub fn replaced(&self) -> Vec<Deployment> { self.replaced.lock().unwrap().clone() }

    pub fn replaced_named(&self, name: &str) -> Option<Deployment> {
        self.replaced().into_iter().find(|d| d.name_any() == name)
    }
}

impl DeploymentStore for FakeStore {
    async fn list_deployments(&self) -> Result<Vec<Deployment>, Error> {
        if self.fail_list {
            return Err(Error::ListDeployments {
                source: Box::new(kube::Error::Service("apiserver unavailable".into())),
            });
        }
        Ok(self.deployments.clone())
    }

    async fn replace_deployment(&self, deployment: &Deployment) -> Result<Deployment, Error> {
        let name = deployment.name_any();
        if self.fail_replace.contains(&name) {
            return Err(Error::UpdateDeployment {
                namespace: deployment.namespace().unwrap_or_default(),
                name,
                source: Box::new(kube::Error::Service("conflict".into())),
            });
        }
        self.replaced.lock().unwrap().push(deployment.clone());
        Ok(deployment.clone())
    }
}
