//! Step catalog.
//!
//! The workflow table: which documents each step needs and produces, and the
//! platforms it applies to. Held as data so callers look steps up instead of
//! branching on them, and replaceable from a TOML file.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::error::{WorkflowError, WorkflowResult};
use super::step::{Applicability, StepDef, StepId};

/// Product overview written by the vision step.
pub const PRODUCT_OVERVIEW: &str = "product/product-overview.md";
/// Roadmap written by the roadmap step.
pub const PRODUCT_ROADMAP: &str = "product/product-roadmap.md";
/// Data model document.
pub const DATA_MODEL: &str = "product/data-model/data-model.md";
/// Per-section spec template.
pub const SECTION_SPEC: &str = "product/sections/[id]/spec.md";
/// Color tokens.
pub const DESIGN_COLORS: &str = "product/design-system/colors.json";
/// Typography tokens.
pub const DESIGN_TYPOGRAPHY: &str = "product/design-system/typography.json";
/// Architecture overview.
pub const ARCHITECTURE_OVERVIEW: &str = "product/architecture/overview.md";

static BUILTIN: Lazy<StepCatalog> = Lazy::new(|| StepCatalog {
    steps: vec![
        StepDef::new(StepId::ProductVision, &[], &[PRODUCT_OVERVIEW]),
        StepDef::new(StepId::ProductRoadmap, &[PRODUCT_OVERVIEW], &[PRODUCT_ROADMAP]),
        StepDef::new(StepId::DataModel, &[PRODUCT_ROADMAP], &[DATA_MODEL]),
        StepDef::new(StepId::Dependencies, &[PRODUCT_ROADMAP], &["product/dependencies.md"]),
        StepDef::new(StepId::DesignTokens, &[PRODUCT_OVERVIEW], &[DESIGN_COLORS, DESIGN_TYPOGRAPHY])
            .applies_to(Applicability::Visual),
        StepDef::new(
            StepId::DesignShell,
            &[DESIGN_COLORS, DESIGN_TYPOGRAPHY],
            &["product/shell/spec.md"],
        )
        .applies_to(Applicability::Visual),
        StepDef::new(StepId::ShapeSection, &[PRODUCT_ROADMAP], &[SECTION_SPEC]),
        StepDef::new(
            StepId::Architecture,
            &[SECTION_SPEC, DATA_MODEL],
            &[ARCHITECTURE_OVERVIEW, "product/architecture/[domain].md"],
        ),
        StepDef::new(StepId::ExportProduct, &[ARCHITECTURE_OVERVIEW], &["product-plan/"]),
    ],
});

/// Ordered set of step definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCatalog {
    /// Steps in workflow order
    pub steps: Vec<StepDef>,
}

impl StepCatalog {
    /// The built-in workflow table.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Build a catalog, rejecting duplicate step ids.
    pub fn new(steps: Vec<StepDef>) -> WorkflowResult<Self> {
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id) {
                return Err(WorkflowError::InvalidCatalog(format!(
                    "step '{}' is defined more than once",
                    step.id
                )));
            }
            if let Some(path) = step.prerequisites.iter().find(|p| p.trim().is_empty()) {
                return Err(WorkflowError::InvalidCatalog(format!(
                    "step '{}' has an empty prerequisite path {path:?}",
                    step.id
                )));
            }
        }
        Ok(Self { steps })
    }

    /// Parse a catalog from TOML (`[[steps]]` tables).
    pub fn from_toml(content: &str) -> WorkflowResult<Self> {
        let raw: Self = toml::from_str(content)?;
        Self::new(raw.steps)
    }

    /// Load a catalog from a TOML file.
    pub fn load_from_file(path: &Path) -> WorkflowResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;
        let catalog = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), steps = catalog.steps.len(), "Loaded step catalog");
        Ok(catalog)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> WorkflowResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Look up a step definition.
    pub fn get(&self, id: StepId) -> Option<&StepDef> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Steps in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &StepDef> {
        self.steps.iter()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the catalog has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for StepCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Platform;

    #[test]
    fn test_builtin_covers_every_step() {
        let catalog = StepCatalog::builtin();
        assert_eq!(catalog.len(), StepId::ALL.len());
        for id in StepId::ALL {
            assert!(catalog.get(id).is_some(), "missing {id}");
        }
    }

    #[test]
    fn test_builtin_order_matches_workflow() {
        let ids: Vec<_> = StepCatalog::builtin().iter().map(|s| s.id).collect();
        assert_eq!(ids, StepId::ALL.to_vec());
    }

    #[test]
    fn test_design_shell_requires_token_outputs() {
        let catalog = StepCatalog::builtin();
        let tokens = catalog.get(StepId::DesignTokens).unwrap();
        let shell = catalog.get(StepId::DesignShell).unwrap();
        assert_eq!(shell.prerequisites, tokens.outputs);
    }

    #[test]
    fn test_visual_steps() {
        let catalog = StepCatalog::builtin();
        for id in [StepId::DesignTokens, StepId::DesignShell] {
            let step = catalog.get(id).unwrap();
            assert!(!step.applies_to.includes(Platform::Cli));
            assert!(!step.applies_to.includes(Platform::Api));
            assert!(step.applies_to.includes(Platform::Web));
        }
        assert_eq!(catalog.get(StepId::DataModel).unwrap().applies_to, Applicability::All);
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml = StepCatalog::builtin().to_toml().unwrap();
        assert!(toml.contains("[[steps]]"));
        let parsed = StepCatalog::from_toml(&toml).unwrap();
        assert_eq!(&parsed, StepCatalog::builtin());
    }

    #[test]
    fn test_from_toml_custom() {
        let toml = r#"
            [[steps]]
            id = "product-vision"
            outputs = ["docs/vision.md"]

            [[steps]]
            id = "export"
            prerequisites = ["docs/vision.md"]
            outputs = ["dist/"]
            applies_to = { only = ["web", "tui"] }
        "#;
        let catalog = StepCatalog::from_toml(toml).unwrap();
        assert_eq!(catalog.len(), 2);
        let export = catalog.get(StepId::ExportProduct).unwrap();
        assert_eq!(export.applies_to, Applicability::Only(vec![Platform::Web, Platform::Tui]));
        assert!(catalog.get(StepId::DataModel).is_none());
    }

    #[test]
    fn test_from_toml_rejects_duplicates() {
        let toml = r#"
            [[steps]]
            id = "data-model"

            [[steps]]
            id = "data-model"
        "#;
        let err = StepCatalog::from_toml(toml).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidCatalog(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_step() {
        let toml = r#"
            [[steps]]
            id = "launch-rocket"
        "#;
        assert!(matches!(StepCatalog::from_toml(toml), Err(WorkflowError::Toml(_))));
    }
}
