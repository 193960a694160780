//! 命令行定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lian-apt - dpkg / apt 的结构化封装
#[derive(Parser, Debug)]
#[command(name = "lian-apt", version, about = "查询与管理 Debian/Ubuntu 软件包")]
pub struct Cli {
    /// 配置文件路径（默认 ~/.config/lian-apt/config.toml）
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// 以 JSON 输出查询结果
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 列出所有包
    List,
    /// 按 dpkg 通配符搜索包
    Search { pattern: String },
    /// 刷新软件源索引 (apt-get update)
    Update,
    /// 列出可升级的包
    Upgradable,
    /// 升级指定的包；不指定时升级全部
    Upgrade { packages: Vec<String> },
    /// 完整升级，可能移除旧包
    DistUpgrade,
    /// 卸载包
    Remove {
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// 安装包
    Install {
        #[arg(required = true)]
        packages: Vec<String>,
    },
}
