pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, ServeArgs, SimulateArgs};

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{ServerSettings, SiteConfig};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "host-site")]
    #[command(about = "Serve a static site and replay its page interaction log")]
    pub struct CliConfig {
        #[arg(long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Serve the site root over HTTP
        Serve(ServeArgs),
        /// Load a page, fire its ready event and click every link
        Simulate(SimulateArgs),
    }

    #[derive(Debug, Clone, Args)]
    pub struct ServeArgs {
        /// Port to listen on (default 8080)
        #[arg(value_name = "PORT")]
        pub port: Option<u16>,

        #[arg(long)]
        pub host: Option<String>,

        #[arg(long, help = "Directory served as the site root")]
        pub root: Option<String>,

        #[arg(long, help = "File served for `/`")]
        pub index: Option<String>,

        #[arg(long, help = "TOML file with a [server] section")]
        pub config: Option<PathBuf>,
    }

    impl ServeArgs {
        /// Settings from the config file (or defaults) with flags applied on top.
        pub fn settings(&self) -> Result<ServerSettings> {
            let mut settings = match &self.config {
                Some(path) => SiteConfig::from_file(path)?.server,
                None => ServerSettings::default(),
            };
            if let Some(port) = self.port {
                settings.port = port;
            }
            if let Some(host) = &self.host {
                settings.host = host.clone();
            }
            if let Some(root) = &self.root {
                settings.root = root.clone();
            }
            if let Some(index) = &self.index {
                settings.index = index.clone();
            }
            settings.validate()?;
            Ok(settings)
        }
    }

    #[derive(Debug, Clone, Args)]
    pub struct SimulateArgs {
        /// HTML file to load
        pub page: PathBuf,

        #[arg(long, help = "URL the page is considered loaded from")]
        pub base_url: Option<String>,

        #[arg(long, help = "Print diagnostic messages as JSON lines")]
        pub json: bool,
    }

    impl SimulateArgs {
        /// `--base-url`, or the page served by a local `serve` on the default port.
        pub fn document_url(&self) -> String {
            match &self.base_url {
                Some(url) => url.clone(),
                None => {
                    let file_name = self
                        .page
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    format!("http://localhost:8080/{}", file_name)
                }
            }
        }
    }

    impl Validate for SimulateArgs {
        fn validate(&self) -> Result<()> {
            validation::validate_path("page", &self.page.to_string_lossy())?;
            validation::validate_url("base_url", &self.document_url())
        }
    }

}
