//! 错误类型定义

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AptError {
    /// 包名为空，在启动任何子进程之前拒绝
    #[error("无效的包：第 {index} 个包名为空 (invalid package with empty name)")]
    InvalidPackage { index: usize },

    /// 外部程序无法启动（不存在、无权限等）
    #[error("无法启动 {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// 外部程序以非零状态退出，附带捕获的输出
    #[error("{program} 执行失败 (exit={}): {}", format_code(.code), .output.trim())]
    Execution {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("转发 {program} 输出失败: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("读取配置文件 {} 失败: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("解析配置文件 {} 失败: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn format_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, AptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_shows_code_and_output() {
        let err = AptError::Execution {
            program: "apt-get".to_string(),
            code: Some(100),
            output: "E: Unable to locate package nope\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get"));
        assert!(msg.contains("exit=100"));
        assert!(msg.contains("Unable to locate package nope"));
    }

    #[test]
    fn killed_by_signal_has_no_code() {
        let err = AptError::Execution {
            program: "apt".to_string(),
            code: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("exit=signal"));
    }
}
