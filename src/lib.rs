pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, ServeArgs, SimulateArgs};

pub use adapters::{
    console::{ConsoleSink, MemorySink},
    storage::LocalSite,
};
pub use config::toml_config::{ServerSettings, SiteConfig};
pub use core::{document::MemoryDocument, page_logger::PageInteractionLogger, server::SiteServer};
pub use domain::model::{CLICK_PREFIX, LOAD_MESSAGE};
pub use utils::error::{Result, SiteError};
