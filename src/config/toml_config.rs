use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ROOT: &str = "./host_website";
pub const DEFAULT_INDEX: &str = "index.html";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_index")]
    pub index: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
            index: default_index(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for ServerSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_path("server.root", &self.root)?;
        validation::validate_file_name("server.index", &self.index)?;
        Ok(())
    }
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| SiteError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML, replacing `${VAR}` with the environment value when set.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.server.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_server_section() {
        let config = SiteConfig::from_toml_str(
            r#"
[server]
host = "127.0.0.1"
port = 9000
root = "./public"
"#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.server.root, "./public");
        assert_eq!(config.server.index, DEFAULT_INDEX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config.server, ServerSettings::default());
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HOST_SITE_TEST_ROOT", "/srv/www");

        let config = SiteConfig::from_toml_str(
            r#"
[server]
root = "${HOST_SITE_TEST_ROOT}"
"#,
        )
        .unwrap();
        assert_eq!(config.server.root, "/srv/www");

        std::env::remove_var("HOST_SITE_TEST_ROOT");
    }

    #[test]
    fn test_invalid_values() {
        let out_of_range = SiteConfig::from_toml_str("[server]\nport = 70000\n");
        assert!(matches!(out_of_range, Err(SiteError::TomlError(_))));

        let config = SiteConfig::from_toml_str("[server]\nindex = \"../index.html\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8181\nindex = \"home.html\"\n")
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 8181);
        assert_eq!(config.server.index, "home.html");
    }
}
