//! Workflow status across all steps.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::documents::DocumentSet;
use super::gate::{Decision, Gate, GateInput, SECTION_PLACEHOLDER};
use super::platform::Platform;
use super::step::{is_template, render_template, StepDef, StepId};

/// Where a single step stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum StepState {
    /// Every output already exists.
    Complete,
    /// Prerequisites met; can run now.
    Ready,
    /// Waiting on the listed documents.
    Blocked { missing: Vec<String> },
    /// Not applicable to the platform.
    Skipped { reason: String },
}

impl StepState {
    /// Short label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Ready => "ready",
            Self::Blocked { .. } => "blocked",
            Self::Skipped { .. } => "skipped",
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStatus {
    pub step: StepId,
    #[serde(flatten)]
    pub state: StepState,
}

/// State of the whole workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    /// Platform the status was computed for
    pub platform: Option<Platform>,

    /// Per-step state in catalog order
    pub steps: Vec<StepStatus>,
}

impl WorkflowStatus {
    /// Compute the status of every step in the gate's catalog.
    pub fn compute(gate: &Gate<'_>, input: &GateInput<'_>, platform: Option<Platform>) -> Self {
        let steps = gate
            .catalog()
            .iter()
            .map(|def| {
                let state = match gate.decide(def, input, platform) {
                    Decision::Skipped { reason } => StepState::Skipped { reason },
                    _ if outputs_exist(def, input) => StepState::Complete,
                    Decision::Allowed => StepState::Ready,
                    Decision::Blocked { missing } => StepState::Blocked { missing },
                };
                StepStatus { step: def.id, state }
            })
            .collect();

        Self { platform, steps }
    }

    /// Steps that can run now and have not produced their outputs yet.
    pub fn next_steps(&self) -> Vec<StepId> {
        self.steps.iter().filter(|s| s.state == StepState::Ready).map(|s| s.step).collect()
    }

    /// Look up one step.
    pub fn get(&self, step: StepId) -> Option<&StepState> {
        self.steps.iter().find(|s| s.step == step).map(|s| &s.state)
    }

    /// Check if every applicable step is complete.
    pub fn is_finished(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s.state, StepState::Complete | StepState::Skipped { .. }))
    }
}

/// A step is done once each output exists. An `[id]` output needs one
/// document per known section; any other templated output needs at least
/// one matching document that isn't another declared output.
fn outputs_exist(def: &StepDef, input: &GateInput<'_>) -> bool {
    if def.outputs.is_empty() {
        return false;
    }
    let section_marker = format!("[{SECTION_PLACEHOLDER}]");
    def.outputs.iter().all(|output| {
        if output.contains(&section_marker) && !input.sections.is_empty() {
            input.sections.iter().all(|section| {
                let mut bindings = HashMap::with_capacity(1);
                bindings.insert(SECTION_PLACEHOLDER.to_string(), section.clone());
                output_present(def, &render_template(output, &bindings), input.documents)
            })
        } else {
            output_present(def, output, input.documents)
        }
    })
}

fn output_present(def: &StepDef, output: &str, documents: &DocumentSet) -> bool {
    if is_template(output) {
        documents.matching(output).any(|doc| !def.outputs.iter().any(|o| o == doc))
    } else {
        documents.contains(output)
    }
}
