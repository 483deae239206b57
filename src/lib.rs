pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::PrintfulClient;
pub use config::RelayConfig;
pub use crate::core::{payload::MockupTemplate, relay::MockupRelay};
pub use server::{App, Server, StaticFiles};
pub use utils::error::{ErrorBody, RelayError, Result};
