//! Document-driven planning workflow.
//!
//! Each planning step reads documents written by earlier steps and writes
//! its own under the project root. The gate decides whether a step may run.
//!
//! ## Steps
//!
//! - `product-vision` - writes `product/product-overview.md`
//! - `product-roadmap` - writes `product/product-roadmap.md`
//! - `data-model`, `dependencies` - need the roadmap
//! - `design-tokens`, `design-shell` - visual platforms only
//! - `shape-section` - one spec per roadmap section
//! - `architecture` - needs every section spec and the data model
//! - `export-product` - writes `product-plan/`

mod catalog;
mod documents;
mod error;
mod gate;
mod platform;
mod roadmap;
mod status;
mod step;

pub use catalog::{
    StepCatalog, ARCHITECTURE_OVERVIEW, DATA_MODEL, DESIGN_COLORS, DESIGN_TYPOGRAPHY,
    PRODUCT_OVERVIEW, PRODUCT_ROADMAP, SECTION_SPEC,
};
pub use documents::{normalize, DocumentSet};
pub use error::{WorkflowError, WorkflowResult};
pub use gate::{can_run, Decision, Gate, GateInput, SECTION_PLACEHOLDER};
pub use platform::Platform;
pub use roadmap::{load_sections, parse_sections, slugify};
pub use status::{StepState, StepStatus, WorkflowStatus};
pub use step::{matches_template, render_template, Applicability, StepDef, StepId};
