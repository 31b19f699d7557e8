//! Logging System
//!
//! Structured logging using the `tracing` crate. The expansion driver selects
//! a [`Verbosity`], which maps onto a `tracing` filter; verbosity only
//! controls how much trace output is produced and never affects generation
//! results.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Trace verbosity for the expansion driver.
///
/// Levels are ordered; a higher level includes everything the lower levels
/// produce.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    /// No trace output.
    #[default]
    None,
    /// Start/end of generation for each depth, and notable events such as
    /// particularly slow rules.
    Info,
    /// Log each non-empty non-terminal during generation.
    Generation,
    /// Log all rule templates before generation.
    DumpTemplates,
    /// Log information derived from the templates.
    DumpDerived,
    /// Log everything, including per-candidate rejections (can cause
    /// significant slowdowns).
    Everything,
}

impl Verbosity {
    /// The `tracing` filter directive this verbosity corresponds to.
    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::None => "off",
            Verbosity::Info => "info",
            Verbosity::Generation | Verbosity::DumpTemplates => "debug",
            Verbosity::DumpDerived | Verbosity::Everything => "trace",
        }
    }
}

/// Initialize the logging system.
///
/// The `WEAVE_LOG` environment variable takes precedence over the requested
/// verbosity, using the usual `tracing_subscriber::EnvFilter` syntax.
pub fn init_logging(verbosity: Verbosity) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_env("WEAVE_LOG") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(verbosity.directive())
            .map_err(|e| ConfigError::InvalidLogDirective(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ConfigError::InitFailed(e.to_string()))
}
