//! 各操作对应的外部命令参数

use crate::config::Config;
use crate::error::{AptError, Result};

/// dpkg-query 的输出格式，字段顺序与 parser::parse_dpkg_query_output 一致
pub const DPKG_QUERY_FORMAT: &str =
    "-f=${Package}\t${Architecture}\t${db:Status-Status}\t${Version}\t${Installed-Size}\t${Binary:summary}\n";

/// dpkg-query 找不到匹配包时的错误提示
pub const NO_MATCH_MARKER: &str = "no packages found matching";

/// dpkg-query 在没有找到包时的退出码
pub const DPKG_QUERY_NOT_FOUND: i32 = 1;

/// 一次外部调用：每次操作都构造新的实例，互不共享
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env: Vec::new(),
        }
    }

    /// 完整命令行，用于日志
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().map(|a| {
            if a.is_empty() || a.contains(char::is_whitespace) {
                format!("{:?}", a)
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }
}

/// 根据配置构造各操作的 Invocation
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    config: Config,
}

impl CommandBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// dpkg-query -W -f=... <pattern>
    pub fn search(&self, pattern: &str) -> Invocation {
        let inv = Invocation::new(&self.config.dpkg_query, &["-W", DPKG_QUERY_FORMAT, pattern]);
        self.with_locale(inv)
    }

    pub fn list(&self) -> Invocation {
        self.search("*")
    }

    /// apt list --upgradable
    pub fn list_upgradable(&self) -> Invocation {
        let inv = Invocation::new(&self.config.apt, &["list", "--upgradable"]);
        self.with_locale(inv)
    }

    /// apt-get update -q
    pub fn check_for_updates(&self) -> Invocation {
        self.apt_get(&["update", "-q"], &[])
    }

    pub fn upgrade_all(&self) -> Invocation {
        self.apt_get(&["upgrade", "-y"], &[])
    }

    pub fn dist_upgrade(&self) -> Invocation {
        self.apt_get(&["dist-upgrade", "-y"], &[])
    }

    pub fn upgrade<P: AsRef<str>>(&self, packages: &[P]) -> Result<Invocation> {
        let names = validate_names(packages)?;
        Ok(self.apt_get(&["upgrade", "-y"], &names))
    }

    pub fn remove<P: AsRef<str>>(&self, packages: &[P]) -> Result<Invocation> {
        let names = validate_names(packages)?;
        Ok(self.apt_get(&["remove", "-y"], &names))
    }

    pub fn install<P: AsRef<str>>(&self, packages: &[P]) -> Result<Invocation> {
        let names = validate_names(packages)?;
        Ok(self.apt_get(&["install", "-y"], &names))
    }

    /// apt-get 变更类命令，按配置加 sudo 与非交互环境变量
    fn apt_get(&self, args: &[&str], packages: &[&str]) -> Invocation {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + packages.len() + 2);
        let program = if self.config.use_sudo {
            full.push(self.config.apt_get.as_str());
            "sudo"
        } else {
            self.config.apt_get.as_str()
        };
        full.extend_from_slice(args);
        full.extend_from_slice(packages);

        let mut inv = self.with_locale(Invocation::new(program, &full));
        if self.config.noninteractive {
            if self.config.use_sudo {
                // sudo 默认会清理环境，通过参数传入
                inv.args.insert(0, "DEBIAN_FRONTEND=noninteractive".to_string());
            } else {
                inv.env
                    .push(("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string()));
            }
        }
        inv
    }

    fn with_locale(&self, mut inv: Invocation) -> Invocation {
        if let Some(locale) = &self.config.locale {
            inv.env.push(("LC_ALL".to_string(), locale.clone()));
        }
        inv
    }
}

/// 所有包名都非空才返回，否则整个调用失败
fn validate_names<P: AsRef<str>>(packages: &[P]) -> Result<Vec<&str>> {
    packages
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let name = p.as_ref();
            if name.trim().is_empty() {
                Err(AptError::InvalidPackage { index })
            } else {
                Ok(name)
            }
        })
        .collect()
}
