use clap::Parser;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST API, e.g. `https://api.example.com`
    pub api_base_url: String,
    /// Base URL of the web app, used to print the new table's page
    pub web_base_url: String,
    pub workspace_id: String,
    /// JWT template requested from the session provider
    pub token_template: String,
    /// Pick an existing connection instead of entering credentials
    pub with_data_source_selector: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            web_base_url: "http://localhost:3000".to_string(),
            workspace_id: String::new(),
            token_template: "api".to_string(),
            with_data_source_selector: false,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".tableport"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn default_log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("tableport.log"))
    }

    /// Read the config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))
    }

    /// Save the config to disk
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create config directory if it doesn't exist
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Command-line values win over the file
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(url) = &cli.web_url {
            self.web_base_url = url.clone();
        }
        if let Some(workspace) = &cli.workspace {
            self.workspace_id = workspace.clone();
        }
        if let Some(template) = &cli.token_template {
            self.token_template = template.clone();
        }
        if cli.data_source_selector {
            self.with_data_source_selector = true;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workspace_id.trim().is_empty() {
            anyhow::bail!("No workspace configured: pass --workspace or set TABLEPORT_WORKSPACE");
        }
        if self.api_base_url.trim().is_empty() {
            anyhow::bail!("No API URL configured: pass --api-url");
        }
        Ok(())
    }

    /// Full web address for an in-app route
    pub fn web_url(&self, route: &str) -> String {
        format!("{}{}", self.web_base_url.trim_end_matches('/'), route)
    }
}

/// Import a warehouse table into a workspace from the terminal
#[derive(Parser, Debug, Default)]
#[command(name = "tableport", version, about)]
pub struct Cli {
    /// Config file to read (defaults to ~/.tableport/config.json)
    #[arg(long, env = "TABLEPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the REST API
    #[arg(long, env = "TABLEPORT_API_URL")]
    pub api_url: Option<String>,

    /// Base URL of the web app
    #[arg(long, env = "TABLEPORT_WEB_URL")]
    pub web_url: Option<String>,

    /// Workspace the table is created in
    #[arg(long, env = "TABLEPORT_WORKSPACE")]
    pub workspace: Option<String>,

    /// Session token issued by the identity provider
    #[arg(long, env = "TABLEPORT_SESSION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// JWT template to request tokens for
    #[arg(long)]
    pub token_template: Option<String>,

    /// Choose an existing connection instead of entering credentials
    #[arg(long)]
    pub data_source_selector: bool,

    /// Where to write the log (defaults to ~/.tableport/tableport.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write the effective settings back to the config file
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::config_path)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(Config::default_log_path)
    }
}
