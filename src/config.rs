use crate::error::{AptError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// 配置文件路径环境变量，优先于默认路径
pub const CONFIG_ENV: &str = "LIAN_APT_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dpkg_query: String,
    pub apt: String,
    pub apt_get: String,
    /// 导出为 LC_ALL，保证 dpkg-query 的提示文本稳定
    pub locale: Option<String>,
    /// 变更类操作通过 sudo 执行
    pub use_sudo: bool,
    /// 变更类操作设置 DEBIAN_FRONTEND=noninteractive
    pub noninteractive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dpkg_query: "dpkg-query".to_string(),
            apt: "apt".to_string(),
            apt_get: "apt-get".to_string(),
            locale: Some("C".to_string()),
            use_sudo: false,
            noninteractive: false,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        resolve_path(std::env::var(CONFIG_ENV).ok(), std::env::var("HOME").ok())
    }

    pub fn load_or_default() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// 文件不存在时返回默认配置
    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            log::debug!("配置文件 {} 不存在，使用默认配置", config_path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&config_path).map_err(|source| AptError::ConfigRead {
            path: config_path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| AptError::ConfigParse {
            path: config_path,
            source,
        })
    }
}

/// LIAN_APT_CONFIG 优先，否则 $HOME/.config/lian-apt/config.toml
fn resolve_path(explicit: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    let home = home.unwrap_or_else(|| ".".to_string());
    PathBuf::from(home).join(".config/lian-apt/config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.locale.as_deref(), Some("C"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apt_get = \"/usr/local/bin/apt-get\"\nuse_sudo = true").unwrap();

        let config = Config::load_from(file.path().to_path_buf()).unwrap();
        assert_eq!(config.apt_get, "/usr/local/bin/apt-get");
        assert!(config.use_sudo);
        assert_eq!(config.dpkg_query, "dpkg-query");
        assert!(!config.noninteractive);
    }

    #[test]
    fn broken_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "use_sudo = \"maybe\"").unwrap();

        let err = Config::load_from(file.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, AptError::ConfigParse { .. }));
    }

    #[test]
    fn explicit_path_wins_over_home() {
        let path = resolve_path(
            Some("/etc/lian-apt.toml".to_string()),
            Some("/home/tester".to_string()),
        );
        assert_eq!(path, PathBuf::from("/etc/lian-apt.toml"));

        let path = resolve_path(None, Some("/home/tester".to_string()));
        assert_eq!(path, PathBuf::from("/home/tester/.config/lian-apt/config.toml"));

        assert_eq!(
            resolve_path(None, None),
            PathBuf::from("./.config/lian-apt/config.toml")
        );
    }
}
