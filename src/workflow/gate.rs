//! Workflow gate.
//!
//! Classifies a proposed step as allowed, blocked on missing documents, or
//! skipped for the chosen platform. The gate reads nothing from disk and
//! holds no state beyond the catalog it was built with.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::StepCatalog;
use super::documents::DocumentSet;
use super::error::{WorkflowError, WorkflowResult};
use super::platform::Platform;
use super::step::{render_template, StepDef, StepId};

/// Placeholder expanded once per roadmap section.
pub const SECTION_PLACEHOLDER: &str = "id";

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    /// All prerequisites exist and the step applies to the platform.
    Allowed,
    /// Prerequisite paths not found, in declared order.
    Blocked { missing: Vec<String> },
    /// The step does not apply to the platform.
    Skipped { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Allowed => 0,
            Self::Blocked { .. } => 2,
            Self::Skipped { .. } => 3,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => f.write_str("allowed"),
            Self::Blocked { missing } => write!(f, "blocked (missing: {})", missing.join(", ")),
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
        }
    }
}

/// Everything the gate knows about the project besides the step and platform.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// Documents that currently exist
    pub documents: &'a DocumentSet,

    /// Section ids declared by the roadmap, in roadmap order
    pub sections: &'a [String],
}

impl<'a> GateInput<'a> {
    pub fn new(documents: &'a DocumentSet) -> Self {
        Self { documents, sections: &[] }
    }

    pub fn with_sections(mut self, sections: &'a [String]) -> Self {
        self.sections = sections;
        self
    }
}

/// Decision function over a step catalog.
#[derive(Debug, Clone, Copy)]
pub struct Gate<'c> {
    catalog: &'c StepCatalog,
}

impl Default for Gate<'static> {
    fn default() -> Self {
        Self::new(StepCatalog::builtin())
    }
}

impl<'c> Gate<'c> {
    /// Create a gate over a catalog.
    pub fn new(catalog: &'c StepCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this gate consults.
    pub fn catalog(&self) -> &'c StepCatalog {
        self.catalog
    }

    /// Resolve a step name to its definition.
    pub fn step(&self, name: &str) -> WorkflowResult<&'c StepDef> {
        let id: StepId = name.parse()?;
        self.definition(id)
    }

    fn definition(&self, id: StepId) -> WorkflowResult<&'c StepDef> {
        self.catalog
            .get(id)
            .ok_or_else(|| WorkflowError::UnknownStep { name: id.to_string() })
    }

    /// Decide whether `step` may run.
    ///
    /// `platform` is `None` until the vision step has chosen one; an unset
    /// platform excludes no step.
    pub fn can_run(
        &self,
        step: &str,
        input: &GateInput<'_>,
        platform: Option<Platform>,
    ) -> WorkflowResult<Decision> {
        let def = self.step(step)?;
        Ok(self.decide(def, input, platform))
    }

    /// Decide for an already resolved step definition.
    pub fn decide(
        &self,
        def: &StepDef,
        input: &GateInput<'_>,
        platform: Option<Platform>,
    ) -> Decision {
        if let Some(platform) = platform {
            if !def.applies_to.includes(platform) {
                tracing::debug!(step = %def.id, %platform, "Step skipped for platform");
                return Decision::Skipped {
                    reason: format!("{} does not apply to platform {platform}", def.id),
                };
            }
        }

        let missing = missing_prerequisites(def, input);
        if missing.is_empty() {
            tracing::debug!(step = %def.id, "Step allowed");
            Decision::Allowed
        } else {
            tracing::debug!(step = %def.id, missing = missing.len(), "Step blocked");
            Decision::Blocked { missing }
        }
    }

    /// Decisions for every catalog step, in catalog order.
    pub fn evaluate_all(
        &self,
        input: &GateInput<'_>,
        platform: Option<Platform>,
    ) -> Vec<(StepId, Decision)> {
        self.catalog.iter().map(|def| (def.id, self.decide(def, input, platform))).collect()
    }

    /// Output paths of `step` with placeholders filled from `bindings`.
    pub fn outputs(
        &self,
        step: &str,
        bindings: &HashMap<String, String>,
    ) -> WorkflowResult<Vec<String>> {
        Ok(self.step(step)?.outputs_for(bindings))
    }
}

/// Decide with the built-in catalog and no roadmap sections.
pub fn can_run(
    step: &str,
    documents: &DocumentSet,
    platform: Option<Platform>,
) -> WorkflowResult<Decision> {
    Gate::default().can_run(step, &GateInput::new(documents), platform)
}

fn missing_prerequisites(def: &StepDef, input: &GateInput<'_>) -> Vec<String> {
    let section_marker = format!("[{SECTION_PLACEHOLDER}]");
    let mut missing = Vec::new();

    for prerequisite in &def.prerequisites {
        if !prerequisite.contains(&section_marker) {
            if !input.documents.contains(prerequisite) {
                missing.push(prerequisite.clone());
            }
            continue;
        }

        if input.sections.is_empty() {
            // Without a roadmap any one section spec will do.
            if input.documents.matching(prerequisite).next().is_none() {
                missing.push(prerequisite.clone());
            }
            continue;
        }

        for section in input.sections {
            let mut bindings = HashMap::with_capacity(1);
            bindings.insert(SECTION_PLACEHOLDER.to_string(), section.clone());
            let path = render_template(prerequisite, &bindings);
            if !input.documents.contains(&path) {
                missing.push(path);
            }
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::catalog::{DATA_MODEL, PRODUCT_OVERVIEW, PRODUCT_ROADMAP};

    fn docs(paths: &[&str]) -> DocumentSet {
        DocumentSet::from_paths(paths.iter().copied())
    }

    #[test]
    fn test_data_model_blocked_without_roadmap() {
        let decision = can_run("data-model", &DocumentSet::new(), Some(Platform::Web)).unwrap();
        assert_eq!(decision, Decision::Blocked { missing: vec![PRODUCT_ROADMAP.to_string()] });
    }

    #[test]
    fn test_data_model_allowed() {
        let decision =
            can_run("data-model", &docs(&[PRODUCT_OVERVIEW, PRODUCT_ROADMAP]), Some(Platform::Web))
                .unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn test_design_tokens_skipped_for_cli() {
        let decision =
            can_run("design-tokens", &docs(&[PRODUCT_OVERVIEW]), Some(Platform::Cli)).unwrap();
        assert_eq!(
            decision,
            Decision::Skipped { reason: "design-tokens does not apply to platform CLI".to_string() }
        );
    }

    #[test]
    fn test_unknown_step() {
        let err = can_run("not-a-real-step", &DocumentSet::new(), Some(Platform::Web)).unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownStep { ref name } if name == "not-a-real-step"));
    }

    #[test]
    fn test_vision_allowed_for_any_documents() {
        for platform in Platform::ALL {
            let decision = can_run("product-vision", &DocumentSet::new(), Some(platform)).unwrap();
            assert!(decision.is_allowed());
        }
        assert!(can_run("product-vision", &docs(&["x.md"]), None).unwrap().is_allowed());
    }

    #[test]
    fn test_unset_platform_excludes_nothing() {
        let decision = can_run("design-tokens", &docs(&[PRODUCT_OVERVIEW]), None).unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn test_design_shell_lists_all_missing_in_order() {
        let decision = can_run("design-shell", &DocumentSet::new(), Some(Platform::Tui)).unwrap();
        assert_eq!(
            decision,
            Decision::Blocked {
                missing: vec![
                    "product/design-system/colors.json".to_string(),
                    "product/design-system/typography.json".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_architecture_without_sections_needs_any_section_spec() {
        let gate = Gate::default();
        let documents = docs(&[DATA_MODEL]);
        let decision = gate
            .can_run("architecture", &GateInput::new(&documents), Some(Platform::Api))
            .unwrap();
        assert_eq!(
            decision,
            Decision::Blocked { missing: vec!["product/sections/[id]/spec.md".to_string()] }
        );

        let documents = docs(&[DATA_MODEL, "product/sections/auth/spec.md"]);
        let decision = gate
            .can_run("architecture", &GateInput::new(&documents), Some(Platform::Api))
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_architecture_expands_every_section() {
        let gate = Gate::default();
        let sections = vec!["auth".to_string(), "billing".to_string(), "reports".to_string()];
        let documents = docs(&["product/sections/billing/spec.md"]);
        let input = GateInput::new(&documents).with_sections(&sections);

        let decision = gate.can_run("architecture", &input, Some(Platform::Web)).unwrap();
        assert_eq!(
            decision,
            Decision::Blocked {
                missing: vec![
                    "product/sections/auth/spec.md".to_string(),
                    "product/sections/reports/spec.md".to_string(),
                    DATA_MODEL.to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_export_alias_and_directory_output() {
        let gate = Gate::default();
        let outputs = gate.outputs("export", &HashMap::new()).unwrap();
        assert_eq!(outputs, vec!["product-plan/"]);
    }

    #[test]
    fn test_outputs_render_bindings() {
        let gate = Gate::default();
        let mut bindings = HashMap::new();
        bindings.insert("id".to_string(), "auth".to_string());
        let outputs = gate.outputs("shape-section", &bindings).unwrap();
        assert_eq!(outputs, vec!["product/sections/auth/spec.md"]);
    }

    #[test]
    fn test_skip_wins_over_missing_documents() {
        let decision = can_run("design-shell", &DocumentSet::new(), Some(Platform::Api)).unwrap();
        assert!(decision.is_skipped());
    }

    #[test]
    fn test_evaluate_all_in_catalog_order() {
        let gate = Gate::default();
        let documents = DocumentSet::new();
        let results = gate.evaluate_all(&GateInput::new(&documents), Some(Platform::Cli));
        let ids: Vec<_> = results.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, StepId::ALL.to_vec());
        assert!(results[0].1.is_allowed());
        assert!(results[4].1.is_skipped());
        assert!(results[1].1.is_blocked());
    }

    #[test]
    fn test_custom_catalog_missing_step_is_unknown() {
        let catalog = StepCatalog::new(vec![StepDef::new(StepId::ProductVision, &[], &["v.md"])])
            .unwrap();
        let gate = Gate::new(&catalog);
        let documents = DocumentSet::new();
        let err = gate.can_run("data-model", &GateInput::new(&documents), None).unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownStep { .. }));
    }

    #[test]
    fn test_decision_json_shape() {
        let json = serde_json::to_value(Decision::Blocked { missing: vec!["a.md".into()] }).unwrap();
        assert_eq!(json["decision"], "blocked");
        assert_eq!(json["missing"][0], "a.md");
        let json = serde_json::to_value(Decision::Allowed).unwrap();
        assert_eq!(json["decision"], "allowed");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Decision::Allowed.exit_code(), 0);
        assert_eq!(Decision::Blocked { missing: vec![] }.exit_code(), 2);
        assert_eq!(Decision::Skipped { reason: String::new() }.exit_code(), 3);
    }
}
