pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use crate::adapters::DEFAULT_API_ENDPOINT;
    use crate::core::sync::DEFAULT_BATCH_SIZE;
    use crate::core::ConfigProvider;
    use crate::domain::model::TicketSortType;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_draw_round, validate_path, validate_positive_number, validate_url, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "lotto-assist")]
    #[command(about = "Check registered lotto tickets against draw results")]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
        pub api_endpoint: String,

        #[arg(long, default_value = "./lotto-data")]
        pub data_path: String,

        /// JSON file with tickets to register before checking
        #[arg(long)]
        pub import: Option<String>,

        /// Override the round computed from the current date
        #[arg(long)]
        pub current_round: Option<i32>,

        #[arg(long, help = "Skip syncing draw results")]
        pub no_sync: bool,

        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        pub batch_size: usize,

        #[arg(long, default_value = "180")]
        pub timeout_seconds: u64,

        #[arg(long, default_value = "registered-date-desc")]
        pub sort: TicketSortType,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn data_path(&self) -> &str {
            &self.data_path
        }

        fn current_round(&self) -> Option<i32> {
            self.current_round
        }

        fn sync_enabled(&self) -> bool {
            !self.no_sync
        }

        fn batch_size(&self) -> usize {
            self.batch_size
        }

        fn request_timeout_seconds(&self) -> u64 {
            self.timeout_seconds
        }

        fn sort_type(&self) -> TicketSortType {
            self.sort
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_url("api_endpoint", &self.api_endpoint)?;
            validate_path("data_path", &self.data_path)?;
            validate_positive_number("batch_size", self.batch_size, 1)?;
            validate_positive_number("timeout_seconds", self.timeout_seconds as usize, 1)?;
            if let Some(round) = self.current_round {
                validate_draw_round("current_round", round)?;
            }
            if let Some(import) = &self.import {
                validate_path("import", import)?;
            }
            Ok(())
        }
    }

}
