// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod guided;
pub mod loader;
pub mod logging;
pub mod masking;
pub mod normalize;
pub mod progress;
pub mod record;
pub mod runtime;
pub mod session;
pub mod store;
pub mod util;

pub use error::{HifzError, Result};
