//! Step identifiers and definitions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::WorkflowError;
use super::platform::Platform;

/// One named phase of the planning workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    ProductVision,
    ProductRoadmap,
    DataModel,
    Dependencies,
    DesignTokens,
    DesignShell,
    ShapeSection,
    Architecture,
    #[serde(alias = "export")]
    ExportProduct,
}

impl StepId {
    /// All steps in workflow order.
    pub const ALL: [Self; 9] = [
        Self::ProductVision,
        Self::ProductRoadmap,
        Self::DataModel,
        Self::Dependencies,
        Self::DesignTokens,
        Self::DesignShell,
        Self::ShapeSection,
        Self::Architecture,
        Self::ExportProduct,
    ];

    /// Identifier as typed by the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProductVision => "product-vision",
            Self::ProductRoadmap => "product-roadmap",
            Self::DataModel => "data-model",
            Self::Dependencies => "dependencies",
            Self::DesignTokens => "design-tokens",
            Self::DesignShell => "design-shell",
            Self::ShapeSection => "shape-section",
            Self::Architecture => "architecture",
            Self::ExportProduct => "export-product",
        }
    }

    /// Identifiers of every step.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('/');
        if name == "export" {
            return Ok(Self::ExportProduct);
        }
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == name)
            .ok_or_else(|| WorkflowError::UnknownStep { name: s.to_string() })
    }
}

/// Which platforms a step applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Applicability {
    /// Every platform.
    All,
    /// Platforms with a visual design surface.
    Visual,
    /// An explicit list.
    Only(Vec<Platform>),
}

impl Default for Applicability {
    fn default() -> Self {
        Self::All
    }
}

impl Applicability {
    /// Check whether a platform is covered.
    pub fn includes(&self, platform: Platform) -> bool {
        match self {
            Self::All => true,
            Self::Visual => platform.is_visual(),
            Self::Only(platforms) => platforms.contains(&platform),
        }
    }
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Visual => f.write_str("visual"),
            Self::Only(platforms) => {
                let names: Vec<_> = platforms.iter().map(|p| p.display_name()).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

/// Static definition of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDef {
    /// Step identifier
    pub id: StepId,

    /// Document paths that must exist first, in evaluation order
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Document paths the step produces
    #[serde(default)]
    pub outputs: Vec<String>,

    /// Platforms the step applies to
    #[serde(default)]
    pub applies_to: Applicability,
}

impl StepDef {
    /// Create a definition that applies to every platform.
    pub fn new(id: StepId, prerequisites: &[&str], outputs: &[&str]) -> Self {
        Self {
            id,
            prerequisites: prerequisites.iter().map(|p| (*p).to_string()).collect(),
            outputs: outputs.iter().map(|p| (*p).to_string()).collect(),
            applies_to: Applicability::All,
        }
    }

    /// Restrict the platforms this step applies to.
    pub fn applies_to(mut self, applies_to: Applicability) -> Self {
        self.applies_to = applies_to;
        self
    }

    /// Output paths with placeholders filled from `bindings`.
    pub fn outputs_for(&self, bindings: &HashMap<String, String>) -> Vec<String> {
        self.outputs.iter().map(|o| render_template(o, bindings)).collect()
    }
}

/// Whether a path contains a `[name]` placeholder.
pub fn is_template(path: &str) -> bool {
    placeholders(path).next().is_some()
}

/// Placeholder names in a path, in order of appearance.
pub fn placeholders(path: &str) -> impl Iterator<Item = &str> {
    path.split('[').skip(1).filter_map(|part| part.split_once(']').map(|(name, _)| name))
}

/// Substitute `[name]` placeholders in one left-to-right pass.
///
/// Unbound placeholders are kept. Substituted values are never rescanned, so
/// a value that itself looks like a placeholder is copied through as text.
pub fn render_template(template: &str, bindings: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                let name = &after[..close];
                match bindings.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[open..open + close + 2]),
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Check whether a concrete path matches a template.
///
/// Each placeholder matches exactly one non-empty path segment; a placeholder
/// may share its segment with literal text (e.g. `[domain].md`).
pub fn matches_template(template: &str, path: &str) -> bool {
    let template_segments: Vec<_> = template.split('/').collect();
    let path_segments: Vec<_> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return false;
    }
    template_segments.iter().zip(&path_segments).all(|(t, p)| segment_matches(t, p))
}

fn segment_matches(template: &str, segment: &str) -> bool {
    let Some(open) = template.find('[') else {
        return template == segment;
    };
    let Some(close) = template[open..].find(']').map(|i| open + i) else {
        return template == segment;
    };
    let prefix = &template[..open];
    let suffix = &template[close + 1..];
    segment.len() > prefix.len() + suffix.len()
        && segment.starts_with(prefix)
        && segment.ends_with(suffix)
}
