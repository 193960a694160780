mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use lian_apt::{AptManager, Config, OutputSink, Package};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // 配置文件优先级：命令行 > LIAN_APT_CONFIG > 默认路径
    let config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => Config::load_or_default()?,
    };

    let mut manager = AptManager::with_config(config);
    log::debug!("使用配置: {:?}", manager.config());
    // 变更类操作直接显示 apt-get 的进度
    manager.set_stdout(OutputSink::Inherit);
    manager.set_stderr(OutputSink::Inherit);

    match cli.command {
        Commands::List => print_packages(&manager.list()?, cli.json)?,
        Commands::Search { pattern } => print_packages(&manager.search(&pattern)?, cli.json)?,
        Commands::Upgradable => print_packages(&manager.list_upgradable()?, cli.json)?,
        Commands::Update => manager.check_for_updates().context("刷新软件源失败")?,
        Commands::Upgrade { packages } if packages.is_empty() => {
            manager.upgrade_all().context("升级失败")?
        }
        Commands::Upgrade { packages } => manager.upgrade(packages.as_slice()).context("升级失败")?,
        Commands::DistUpgrade => manager.dist_upgrade().context("完整升级失败")?,
        Commands::Remove { packages } => manager.remove(packages.as_slice()).context("卸载失败")?,
        Commands::Install { packages } => manager.install(packages.as_slice()).context("安装失败")?,
    }

    Ok(())
}

fn print_packages(packages: &[Package], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(packages)?);
        return Ok(());
    }

    let width = |f: fn(&Package) -> &str, min: usize| {
        packages.iter().map(|p| f(p).chars().count()).max().unwrap_or(0).max(min)
    };
    let name_w = width(|p| p.name.as_str(), 4);
    let ver_w = width(|p| p.version.as_str(), 7);
    let arch_w = width(|p| p.architecture.as_str(), 4);
    let status_w = width(|p| p.status.as_str(), 6);

    println!(
        "{:<name_w$}  {:<ver_w$}  {:<arch_w$}  {:<status_w$}  {:>8}  DESCRIPTION",
        "NAME", "VERSION", "ARCH", "STATUS", "SIZE(KB)"
    );
    for p in packages {
        println!(
            "{:<name_w$}  {:<ver_w$}  {:<arch_w$}  {:<status_w$}  {:>8}  {}",
            p.name, p.version, p.architecture, p.status, p.installed_size_kb, p.short_description
        );
    }
    Ok(())
}
