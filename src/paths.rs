/// Where commit-index keeps its indexes and configuration
///
/// Follows the XDG base directories on Linux and the usual per-user locations on
/// Windows and macOS.
use std::path::PathBuf;

/// Directory name used under the platform data and config directories
pub const PROJECT_DIR_NAME: &str = "commit-index";

/// Base directory lookup for one platform convention
struct DirSpec {
    windows_var: &'static str,
    macos_subdir: &'static str,
    xdg_var: &'static str,
    xdg_home_subdir: &'static str,
}

impl DirSpec {
    /// Falls back to the working directory when no variable is set
    fn resolve(&self) -> PathBuf {
        let home_join =
            |subdir: &str| std::env::var("HOME").map(|home| PathBuf::from(home).join(subdir));

        let resolved = if cfg!(target_os = "windows") {
            std::env::var(self.windows_var).map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            home_join(self.macos_subdir)
        } else {
            std::env::var(self.xdg_var)
                .map(PathBuf::from)
                .or_else(|_| home_join(self.xdg_home_subdir))
        };

        resolved.unwrap_or_else(|_| PathBuf::from("."))
    }
}

const DATA_DIR: DirSpec = DirSpec {
    windows_var: "LOCALAPPDATA",
    macos_subdir: "Library/Application Support",
    xdg_var: "XDG_DATA_HOME",
    xdg_home_subdir: ".local/share",
};

const CONFIG_DIR: DirSpec = DirSpec {
    windows_var: "APPDATA",
    macos_subdir: "Library/Application Support",
    xdg_var: "XDG_CONFIG_HOME",
    xdg_home_subdir: ".config",
};

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    /// Data directory: %LOCALAPPDATA%, ~/Library/Application Support, or
    /// $XDG_DATA_HOME (~/.local/share)
    pub fn data_dir() -> PathBuf {
        DATA_DIR.resolve()
    }

    /// Config directory: %APPDATA%, ~/Library/Application Support, or
    /// $XDG_CONFIG_HOME (~/.config)
    pub fn config_dir() -> PathBuf {
        CONFIG_DIR.resolve()
    }

    /// Returns: {data_dir}/commit-index
    pub fn project_data_dir() -> PathBuf {
        Self::data_dir().join(PROJECT_DIR_NAME)
    }

    /// Returns: {config_dir}/commit-index
    pub fn project_config_dir() -> PathBuf {
        Self::config_dir().join(PROJECT_DIR_NAME)
    }

    /// Root directory holding one Tantivy index per collection
    ///
    /// Returns: {data_dir}/commit-index/indexes
    pub fn default_index_path() -> PathBuf {
        Self::project_data_dir().join("indexes")
    }

    /// Returns: {config_dir}/commit-index/config.toml
    pub fn default_config_path() -> PathBuf {
        Self::project_config_dir().join("config.toml")
    }
}
