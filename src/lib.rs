//! # Plangate
//!
//! Gatekeeper for document-driven product planning.
//!
//! A planning workflow is a sequence of steps (vision, roadmap, data model,
//! design, section specs, architecture, export). Each step reads documents
//! written by the steps before it. Plangate decides, from the documents that
//! exist and the chosen target platform, whether a step may run, which
//! documents are still missing, or whether the step does not apply at all.
//!
//! ## Quick Start
//!
//! ```bash
//! # What can I do next?
//! plangate status
//!
//! # May the data-model step run?
//! plangate check data-model
//! ```
//!
//! ```
//! use plangate::workflow::{can_run, Decision, DocumentSet, Platform};
//!
//! let docs = DocumentSet::from_paths(["product/product-overview.md"]);
//! let decision = can_run("data-model", &docs, Some(Platform::Web)).unwrap();
//! assert_eq!(
//!     decision,
//!     Decision::Blocked { missing: vec!["product/product-roadmap.md".to_string()] }
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]

pub mod core;
pub mod workflow;

// Re-export commonly used types
pub use crate::core::Config;
pub use workflow::{
    can_run, Decision, DocumentSet, Gate, GateInput, Platform, StepCatalog, StepId,
    WorkflowError, WorkflowResult, WorkflowStatus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "plangate";
