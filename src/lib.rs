pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpDrawSource;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{engine::LottoEngine, ticket_book::TicketBook};
pub use domain::ticket::TicketInfo;
pub use utils::error::{LottoError, Result};
