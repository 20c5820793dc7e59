//! folio CLI Library
//!
//! Command implementations for the `folio` binary: generating the typed
//! registry module, validating content, listing entries and scaffolding
//! new entries.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (sync, check, list, new)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use folio::cmd;
//!
//! // Regenerate the registry module once
//! cmd::sync::run(Path::new("folio.toml"), None).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use folio_collections::{ContentLoader, ContentRegistry};
pub use folio_core::Config;

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// folio::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
