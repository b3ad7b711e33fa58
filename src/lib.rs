/// Implemented RL algorithms
pub mod algo;

/// Next-free file names for exported artifacts
pub mod artifact;

/// Default layout and hyperparameters
pub mod config;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error type
pub mod error;

/// Exploration policies
pub mod exploration;

/// Q-table heatmap export
pub mod export;

/// Training environments
pub mod gym;

/// Rendering and sound capabilities injected into the loops
pub mod hooks;

/// Training and evaluation loops
pub mod runner;

/// Terminal rendering
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use config::Config;
pub use error::{Error, Result};
