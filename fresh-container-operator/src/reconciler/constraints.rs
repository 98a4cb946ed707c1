use std::collections::BTreeMap;

use fresh_container_base::consts::k8s::annotations;

/// Version constraint expressions keyed by container name.
pub type Constraints = BTreeMap<String, String>;

/// Result of looking for constraint declarations on a pod template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConstraintLookup {
    Found(Constraints),

    /// No annotation carries the constraint prefix.
    NoConstraints,
}

/// Collects the constraints declared by `template_annotations`.
///
/// The container name is whatever follows the prefix, it is not checked
/// against the containers of the template.
#[must_use]
pub fn extract<'a, I>(template_annotations: I) -> ConstraintLookup
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let prefix = annotations::CONSTRAINT_PREFIX.as_str();
    let constraints = template_annotations
        .into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(prefix).map(|container_name| (container_name.to_string(), value.clone()))
        })
        .collect::<Constraints>();

    if constraints.is_empty() {
        ConstraintLookup::NoConstraints
    } else {
        ConstraintLookup::Found(constraints)
    }
}
