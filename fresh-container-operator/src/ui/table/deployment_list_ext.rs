//! Renders the freshness state of deployments as a table.

use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;

use crate::{
    ext::DeploymentExt,
    reconciler::{ConstraintLookup, extract_constraints, is_autopilot_enabled},
};

pub trait DeploymentListExt {
    /// Renders every deployment that declares at least one constraint.
    ///
    /// Columns are "NAMESPACE", "NAME", "CONSTRAINTS", "OUTDATED", "NEXT TAGS",
    /// "AUTOPILOT" and "LAST CHECKED".
    fn render_table(&self) -> String;
}

impl DeploymentListExt for [Deployment] {
    fn render_table(&self) -> String {
        let rows = self.iter().filter_map(deployment_column).collect::<Vec<_>>();
        comfy_table::Table::new()
            .load_preset(comfy_table::presets::NOTHING)
            .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
            .set_header(vec![
                "NAMESPACE",
                "NAME",
                "CONSTRAINTS",
                "OUTDATED",
                "NEXT TAGS",
                "AUTOPILOT",
                "LAST CHECKED",
            ])
            .add_rows(rows)
            .to_string()
    }
}

fn deployment_column(deployment: &Deployment) -> Option<[String; 7]> {
    let ConstraintLookup::Found(constraints) =
        extract_constraints(deployment.template_annotations().into_iter().flatten())
    else {
        return None;
    };

    Some([
        deployment.namespace().unwrap_or_default(),
        deployment.name_any(),
        join_pairs(
            constraints.iter().map(|(name, constraint)| (name.as_str(), constraint.as_str())),
        ),
        deployment.has_outdated_containers().unwrap_or("unknown").to_string(),
        join_pairs(deployment.next_tags()),
        is_autopilot_enabled(deployment).to_string(),
        deployment.last_checked().unwrap_or("never").to_string(),
    ])
}

fn join_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let pairs = pairs.into_iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>();
    if pairs.is_empty() { "-".to_string() } else { pairs.join(", ") }
}
