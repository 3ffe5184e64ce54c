use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use lexilens_config::Config;
use serde::{Deserialize, Serialize};

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "LexiLens")
}

/// Platform config folder, or `.lexilens` in the working directory
fn config_root() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".lexilens"))
}

fn default_data_root() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".lexilens"))
}

fn profiles_dir() -> PathBuf {
    config_root().join("profiles")
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Environment-derived defaults, without the secret key
fn seed_config() -> Config {
    let mut config = Config::new();
    config.backend.api_key.clear();
    config
}

/// Initialize user config folders and main profile if missing
pub fn init_user_config() -> anyhow::Result<()> {
    init_profiles_in(&profiles_dir())
}

fn init_profiles_in(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let main_profile = dir.join("main.json");

    if !main_profile.exists() {
        let profile = Profile {
            name: "main".into(),
            value: seed_config(),
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile at {}", main_profile.display());
    }

    Ok(())
}

/// Load a user profile by name, defaulting to main if name not found
pub fn load_user_profile(name: &str) -> anyhow::Result<Config> {
    load_profile_from(&profiles_dir(), name)
}

fn load_profile_from(dir: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = dir.join(format!("{name}.json"));

    if profile_file.exists() {
        read_profile(&profile_file)
    } else {
        tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
        let main_file = dir.join("main.json");
        if main_file.exists() {
            read_profile(&main_file)
        } else {
            Ok(Config::new())
        }
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse profile {}", path.display()))?;
    Ok(profile.value)
}

/// File holding the client-held records of one profile
pub fn client_state_path(config: &Config, profile: &str) -> PathBuf {
    config
        .data_dir
        .clone()
        .unwrap_or_else(default_data_root)
        .join("clients")
        .join(format!("{profile}.json"))
}
