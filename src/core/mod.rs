//! Core types shared by the library and the binary.

mod config;

pub use config::{Config, GeneralConfig, OutputFormat, WorkflowConfig, LOCAL_CONFIG_FILE};
