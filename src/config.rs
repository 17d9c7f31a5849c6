//! Configuration management for the word count language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration (`.wordcount.toml`) discovery and loading
//! - Resolving effective settings: CLI > project file > built-in defaults

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::controller::ControllerOptions;
use crate::metrics::CountOptions;
use crate::status::DEFAULT_ICON;

/// File name searched for in the workspace and its ancestors
pub const PROJECT_CONFIG_FILE: &str = ".wordcount.toml";

/// Content-type tag counted when nothing else is configured
pub const DEFAULT_LANGUAGE: &str = "markdown";

/// Command-line arguments for the word count language server
#[derive(Debug, Parser)]
#[command(name = "wordcount-ls")]
#[command(about = "Language server reporting word and character counts for markdown")]
#[command(version)]
pub struct Args {
    /// Icon shown before the counts
    #[arg(long, help = "Status bar icon (e.g. '$(pencil)')")]
    pub icon: Option<String>,

    /// Content-type tags to count, repeatable
    #[arg(
        long = "language",
        value_name = "LANGUAGE_ID",
        help = "Language id to count (repeatable, default: markdown)"
    )]
    pub languages: Vec<String>,

    /// Exclude `<...>` tag-like sequences from counts
    #[arg(long, help = "Strip inline HTML/tag-like sequences before counting")]
    pub strip_tags: bool,

    /// Ignore selection changes and only report whole-document counts
    #[arg(long, help = "Do not report counts for the selection")]
    pub no_selection: bool,

    /// Explicit project configuration file
    #[arg(long, value_name = "PATH", help = "Path to a .wordcount.toml file")]
    pub config: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Settings read from `.wordcount.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub icon: Option<String>,
    pub languages: Option<Vec<String>>,
    pub strip_tags: Option<bool>,
    pub track_selection: Option<bool>,
}

impl ProjectConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Icon set on the command line
    pub cli_icon: Option<String>,
    /// Languages set on the command line
    pub cli_languages: Vec<String>,
    pub cli_strip_tags: bool,
    pub cli_no_selection: bool,
    /// Whether the config path was given explicitly (disables discovery)
    pub explicit_config: bool,
    /// Loaded project configuration, if any
    pub project: Option<ProjectConfig>,
    /// Where the project configuration lives (or would be reloaded from)
    pub project_config_path: Option<PathBuf>,
    /// Directory a project file is expected in when none exists yet
    pub search_root: PathBuf,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments, discovering the
    /// project file from the current directory
    pub fn from_args_and_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::from_args_in(Args::parse(), &cwd)
    }

    /// Create configuration from explicit arguments and a start directory
    /// for discovery (useful for testing)
    pub fn from_args_in(args: Args, start_dir: &Path) -> Result<Self> {
        let explicit_config = args.config.is_some();
        let project_config_path = match args.config {
            Some(path) => Some(path),
            None => discover_project_config(start_dir),
        };

        let project = project_config_path
            .as_deref()
            .map(ProjectConfig::load)
            .transpose()?;

        Ok(Config {
            cli_icon: args.icon,
            cli_languages: args.languages,
            cli_strip_tags: args.strip_tags,
            cli_no_selection: args.no_selection,
            explicit_config,
            project,
            project_config_path,
            search_root: start_dir.to_path_buf(),
            log_level: args.log_level,
        })
    }

    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }

    /// Look for a project file under a new workspace root. Keeps the current
    /// file if the path was given explicitly or nothing is found there.
    ///
    /// A file that fails to parse is still recorded as the file to watch and
    /// its settings are dropped, so fixing it later takes effect.
    pub fn rediscover(&mut self, root: &Path) -> Result<bool> {
        if self.explicit_config {
            return Ok(false);
        }
        self.search_root = root.to_path_buf();

        let Some(path) = discover_project_config(root) else {
            return Ok(false);
        };
        if self.project_config_path.as_deref() == Some(path.as_path()) {
            return Ok(false);
        }

        self.project = None;
        self.project_config_path = Some(path.clone());
        self.project = Some(ProjectConfig::load(&path)?);
        Ok(true)
    }

    /// The file to watch: the known project file, or where a new one would
    /// be created under the search root
    pub fn watch_target(&self) -> PathBuf {
        self.project_config_path
            .clone()
            .unwrap_or_else(|| self.search_root.join(PROJECT_CONFIG_FILE))
    }

    /// Apply the project file's new content after it changed on disk.
    ///
    /// `None` means the file is gone, which falls back to CLI values and
    /// defaults. Content that fails to parse leaves the settings untouched.
    pub fn reload_project(&mut self, path: &Path, content: Option<&str>) -> Result<()> {
        match content {
            Some(content) => {
                let project = ProjectConfig::from_toml(content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
                self.project = Some(project);
                self.project_config_path = Some(path.to_path_buf());
            }
            None => self.project = None,
        }
        Ok(())
    }

    pub fn effective_icon(&self) -> String {
        self.cli_icon
            .clone()
            .or_else(|| self.project.as_ref().and_then(|p| p.icon.clone()))
            .unwrap_or_else(|| DEFAULT_ICON.to_string())
    }

    pub fn effective_languages(&self) -> Vec<String> {
        if !self.cli_languages.is_empty() {
            return self.cli_languages.clone();
        }
        self.project
            .as_ref()
            .and_then(|p| p.languages.clone())
            .filter(|languages| !languages.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_LANGUAGE.to_string()])
    }

    pub fn effective_strip_tags(&self) -> bool {
        self.cli_strip_tags || self.project.as_ref().and_then(|p| p.strip_tags).unwrap_or(false)
    }

    pub fn effective_track_selection(&self) -> bool {
        !self.cli_no_selection
            && self
                .project
                .as_ref()
                .and_then(|p| p.track_selection)
                .unwrap_or(true)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            icon: self.effective_icon(),
            languages: self.effective_languages(),
            count: CountOptions {
                strip_tags: self.effective_strip_tags(),
            },
            track_selection: self.effective_track_selection(),
        }
    }
}

/// Walk from `start` up through its ancestors looking for
/// `.wordcount.toml`, then fall back to the user config directory.
pub fn discover_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
        .or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("wordcount-ls").join("config.toml"))
                .filter(|candidate| candidate.is_file())
        })
}
