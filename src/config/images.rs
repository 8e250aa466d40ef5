//! Image template handling for add-on workloads

/// Placeholder the admin commands replace with the component name
/// (`docker-registry`, `haproxy-router`, `deployer`, ...).
pub const COMPONENT_PLACEHOLDER: &str = "${component}";

/// Templated image reference, e.g. `openshift/origin-${component}:v1.3.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTemplate {
    format: String,
}

impl ImageTemplate {
    /// Build the template for `prefix` and `tag`.
    ///
    /// The component placeholder is kept verbatim so the delegate can expand
    /// it for each image it deploys.
    pub fn for_tag(prefix: &str, tag: &str) -> Self {
        Self {
            format: format!("{}-{}:{}", prefix, COMPONENT_PLACEHOLDER, tag),
        }
    }

    /// The raw format string handed to `--images`
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Expand the template for a single component
    pub fn expand(&self, component: &str) -> String {
        self.format.replace(COMPONENT_PLACEHOLDER, component)
    }
}

impl std::fmt::Display for ImageTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format)
    }
}
