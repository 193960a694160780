//! 包管理器模块 — 对 dpkg-query / apt / apt-get 的封装

pub mod command;
pub mod executor;
pub mod parser;
pub mod streaming;
pub mod types;

// 重新导出常用类型和函数
pub use command::{CommandBuilder, Invocation};
pub use executor::{Executor, StreamMode, SystemExecutor};
pub use parser::{parse_apt_list_upgradable, parse_dpkg_query_output};
pub use streaming::{OutputSink, OutputSinks};
pub use types::{CommandOutput, Package};

use crate::config::Config;
use crate::error::{AptError, Result};
use command::{DPKG_QUERY_NOT_FOUND, NO_MATCH_MARKER};

/// 每次操作都构造新的子进程，不在调用之间共享任何进程句柄。
/// 变更类操作需要 `&mut self`，同一个实例不能同时执行两个。
#[derive(Debug)]
pub struct AptManager<E: Executor = SystemExecutor> {
    commands: CommandBuilder,
    executor: E,
    sinks: OutputSinks,
}

impl AptManager<SystemExecutor> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_executor(config, SystemExecutor)
    }
}

impl Default for AptManager<SystemExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> AptManager<E> {
    pub fn with_executor(config: Config, executor: E) -> Self {
        Self {
            commands: CommandBuilder::new(config),
            executor,
            sinks: OutputSinks::default(),
        }
    }

    pub fn config(&self) -> &Config {
        self.commands.config()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// 设置变更类操作的 stdout 去向
    pub fn set_stdout(&mut self, sink: OutputSink) {
        self.sinks.stdout = sink;
    }

    /// 设置变更类操作的 stderr 去向
    pub fn set_stderr(&mut self, sink: OutputSink) {
        self.sinks.stderr = sink;
    }

    // ===== 查询 =====

    /// 列出系统中已知的所有包
    pub fn list(&self) -> Result<Vec<Package>> {
        self.query(self.commands.list())
    }

    /// 列出匹配 pattern 的包；没有匹配时返回空列表而不是错误
    pub fn search(&self, pattern: &str) -> Result<Vec<Package>> {
        self.query(self.commands.search(pattern))
    }

    fn query(&self, invocation: Invocation) -> Result<Vec<Package>> {
        log::debug!("执行: {}", invocation.display());
        let output = self.executor.capture(&invocation, StreamMode::Combined)?;

        if !output.success() {
            let text = output.combined_output();
            // 退出码 1 是 dpkg-query 的“未找到”；文本匹配兼容其他版本
            if output.code == Some(DPKG_QUERY_NOT_FOUND) || text.contains(NO_MATCH_MARKER) {
                log::debug!("{} 没有匹配的包", invocation.display());
                return Ok(Vec::new());
            }
            return Err(AptError::Execution {
                program: invocation.program,
                code: output.code,
                output: text,
            });
        }

        Ok(parse_dpkg_query_output(&output.stdout))
    }

    /// 列出可升级的包及 UpgradeAll 将安装的版本
    pub fn list_upgradable(&self) -> Result<Vec<Package>> {
        let invocation = self.commands.list_upgradable();
        log::debug!("执行: {}", invocation.display());
        // apt 会在 stderr 输出 "does not have a stable CLI interface" 警告，只解析 stdout
        let output = self.executor.capture(&invocation, StreamMode::Separate)?;
        if !output.success() {
            return Err(AptError::Execution {
                program: invocation.program,
                code: output.code,
                output: output.combined_output(),
            });
        }
        Ok(parse_apt_list_upgradable(&output.stdout))
    }

    // ===== 变更 =====

    /// apt-get update，刷新软件源索引
    pub fn check_for_updates(&mut self) -> Result<()> {
        let invocation = self.commands.check_for_updates();
        self.run(invocation)
    }

    /// 升级指定的包
    pub fn upgrade<P: AsRef<str>>(&mut self, packages: &[P]) -> Result<()> {
        let invocation = self.commands.upgrade(packages)?;
        self.run(invocation)
    }

    /// 升级所有可升级的包
    pub fn upgrade_all(&mut self) -> Result<()> {
        let invocation = self.commands.upgrade_all();
        self.run(invocation)
    }

    /// 升级所有包，必要时移除旧包以安装新版本
    pub fn dist_upgrade(&mut self) -> Result<()> {
        let invocation = self.commands.dist_upgrade();
        self.run(invocation)
    }

    pub fn remove<P: AsRef<str>>(&mut self, packages: &[P]) -> Result<()> {
        let invocation = self.commands.remove(packages)?;
        self.run(invocation)
    }

    pub fn install<P: AsRef<str>>(&mut self, packages: &[P]) -> Result<()> {
        let invocation = self.commands.install(packages)?;
        self.run(invocation)
    }

    fn run(&mut self, invocation: Invocation) -> Result<()> {
        log::debug!("执行: {}", invocation.display());
        let output = self.executor.stream(&invocation, &mut self.sinks)?;
        if output.success() {
            return Ok(());
        }
        log::warn!("{} 退出码 {:?}", invocation.display(), output.code);
        Err(AptError::Execution {
            program: invocation.program,
            code: output.code,
            output: output.combined_output(),
        })
    }
}
