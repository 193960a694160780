//! AptManager 相关数据类型定义

use serde::{Deserialize, Serialize};

/// 一条包记录，由 dpkg-query 或 apt list 的一行输出解析而来
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// 工具原样给出的状态，如 "installed"、"upgradable"
    pub status: String,
    pub architecture: String,
    pub version: String,
    pub short_description: String,
    pub installed_size_kb: i64,
}

impl Package {
    /// 仅包含包名的引用，用于 install / remove / upgrade
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl AsRef<str> for Package {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// 命令输出结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// 被信号终止时为 None
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn combined_output(&self) -> String {
        let stdout = String::from_utf8_lossy(&self.stdout);
        let stderr = String::from_utf8_lossy(&self.stderr);
        match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
            (_, true) => stdout.into_owned(),
            (true, false) => stderr.into_owned(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }
}
