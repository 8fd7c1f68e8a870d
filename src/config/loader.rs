//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/legacydoc/config.toml)
//! 3. Project config (.legacydoc/config.toml)
//! 4. `DEFAULT_MODEL` environment variable
//! 5. Environment variables (LEGACYDOC_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{AgentError, Result};

/// Legacy variable selecting the model, kept for existing `.env` files
pub const DEFAULT_MODEL_VAR: &str = "DEFAULT_MODEL";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let global_path = Self::global_config_path();
        Self::load_layers(global_path.as_deref(), &Self::project_config_path())
    }

    /// Resolve the chain from explicit global and project file paths
    pub fn load_layers(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global_path
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(project_path));
        }

        figment = figment
            .merge(
                Env::raw()
                    .only(&[DEFAULT_MODEL_VAR])
                    .map(|_| "llm.model".into()),
            )
            // e.g. LEGACYDOC_LLM_MODEL -> llm.model
            .merge(Env::prefixed("LEGACYDOC_").split('_').lowercase(true));

        Self::extract(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| AgentError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/legacydoc/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("legacydoc"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".legacydoc")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;
        println!("{}", Self::render(&config, as_json)?);
        Ok(())
    }

    fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| AgentError::config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default config file into `dir`, returning its path
    pub fn init_in(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config_file())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir()
            .ok_or_else(|| AgentError::config("Cannot determine global config directory"))?;
        Self::init_in(&global_dir, force)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::init_in(&Self::project_dir(), force)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Default config content (TOML)
    fn default_config_file() -> String {
        r#"# legacydoc Configuration
# Project settings in .legacydoc/config.toml override ~/.config/legacydoc/config.toml.

version = "1.0"

[llm]
# openai, anthropic, gemini or ollama; claude-* and gemini/* models select their provider
provider = "openai"
model = "gpt-4o-mini"
timeout_secs = 300
temperature = 0.2
max_tokens = 4096
# endpoint = "http://localhost:11434"

[output]
dir = "output"
pdf = false

[scan]
exclude = [".git/**", "output/**", "__pycache__/**", ".venv/**", "build/**"]
max_file_size = 1048576

[history]
jsonl_path = "run_history.jsonl"
csv_path = "run_history.csv"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const MODEL_VARS: [&str; 2] = [DEFAULT_MODEL_VAR, "LEGACYDOC_LLM_MODEL"];

    fn clear_model_vars() {
        // SAFETY: every test touching these variables runs under #[serial]
        unsafe {
            for var in MODEL_VARS {
                env::remove_var(var);
            }
        }
    }

    fn missing_paths(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
        (
            temp_dir.path().join("global.toml"),
            temp_dir.path().join("project.toml"),
        )
    }

    #[test]
    #[serial]
    fn test_load_default_config() {
        clear_model_vars();
        let temp_dir = TempDir::new().unwrap();
        let (global, project) = missing_paths(&temp_dir);

        let config = ConfigLoader::load_layers(Some(&global), &project).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    #[serial]
    fn test_load_uses_xdg_config_home() {
        clear_model_vars();
        let temp_dir = TempDir::new().unwrap();
        let previous = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let global = ConfigLoader::global_config_path().unwrap();
        assert_eq!(global, temp_dir.path().join("legacydoc").join("config.toml"));

        unsafe {
            match previous {
                Some(value) => env::set_var("XDG_CONFIG_HOME", value),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_project_overrides_global() {
        clear_model_vars();
        let temp_dir = TempDir::new().unwrap();
        let (global, project) = missing_paths(&temp_dir);
        fs::write(&global, "[llm]\nmodel = \"global-model\"\ntimeout_secs = 60\n").unwrap();
        fs::write(&project, "[llm]\nmodel = \"project-model\"\n").unwrap();

        let config = ConfigLoader::load_layers(Some(&global), &project).unwrap();
        assert_eq!(config.llm.model, "project-model");
        assert_eq!(config.llm.timeout_secs, 60);
    }

    #[test]
    fn test_init_writes_loadable_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_in(temp_dir.path(), false).unwrap();
        assert!(path.exists());

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.scan.max_file_size, 1_048_576);
    }

    #[test]
    fn test_init_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::init_in(temp_dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::init_in(temp_dir.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[llm]"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[llm]\nprovider = \"ollama\"\nmodel = \"llama3\"\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.timeout_secs, 300);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[llm]\ntemperature = 5.0\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(json.contains("\"provider\": \"openai\""));
        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("[llm]"));
    }

    #[test]
    #[serial]
    fn test_env_override() {
        clear_model_vars();
        let temp_dir = TempDir::new().unwrap();
        let (global, project) = missing_paths(&temp_dir);
        fs::write(&project, "[llm]\nmodel = \"project-model\"\n").unwrap();

        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            env::set_var(DEFAULT_MODEL_VAR, "legacy-model");
        }
        let config = ConfigLoader::load_layers(Some(&global), &project).unwrap();
        assert_eq!(config.llm.model, "legacy-model");

        unsafe {
            env::set_var("LEGACYDOC_LLM_MODEL", "test-model");
        }
        let config = ConfigLoader::load_layers(Some(&global), &project).unwrap();
        assert_eq!(config.llm.model, "test-model");

        clear_model_vars();
    }
}
