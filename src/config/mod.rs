mod settings;

pub use settings::{Config, Defaults, ExportSettings};

use crate::error::{InvoiceError, Result};
use crate::storage::FileStore;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.invoice-builder/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoice-builder") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".invoice-builder"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the configured output directory against the config directory
pub fn resolve_output_dir(output_dir: &str, cfg_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        cfg_dir.join(path)
    }
}

/// The key-value store holding the saved invoice
pub fn open_store(cfg_dir: &Path) -> FileStore {
    FileStore::new(cfg_dir.join("storage"))
}

/// Load config.toml, falling back to built-in defaults when it is absent
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    let path = cfg_dir.join("config.toml");
    if !path.exists() {
        log::debug!("{} not found, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"# Page used for PDF export (A4 portrait by default)
[page]
width_mm = 210.0
height_mm = 297.0
margin_mm = 5.0

[export]
output_dir = "output"   # relative to this directory, or an absolute/~ path

# Starting values for a new invoice
[defaults]
currency = "USD"        # USD, EUR, GBP, INR, JPY, AUD, CAD
tax_rate = 10.0         # percent
theme = "dark"          # dark or light (PDF background)
"#;
