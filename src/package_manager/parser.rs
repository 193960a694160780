//! 输出解析函数

use super::types::Package;
use regex::Regex;
use std::sync::LazyLock;

/// apt list --upgradable 的行格式：
///   `name/suite[,suite] version arch [upgradable from: old]`
static UPGRADABLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^ ]+) ([^ ]+) ([^ ]+)( \[upgradable from: [^\[\]]*\])?")
        .expect("upgradable line pattern is valid")
});

pub const UPGRADABLE_STATUS: &str = "upgradable";

/// 清理终端输出中的 ANSI 转义序列和特殊字符
pub fn clean_terminal_output(input: &str) -> String {
    let mut result = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            c if c.is_control() && c != '\n' && c != '\t' => {}
            _ => result.push(c),
        }
    }

    result
}

/// 解析 dpkg-query -W -f=... 的输出
///
/// 每行六个 tab 分隔字段：包名、架构、状态、版本、安装大小、简述。
/// 字段不足的行会被跳过；安装大小无法解析时记为 0。
pub fn parse_dpkg_query_output(output: &[u8]) -> Vec<Package> {
    let text = String::from_utf8_lossy(output);
    let mut packages = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.splitn(6, '\t').collect();
        let [name, architecture, status, version, size, description] = fields[..] else {
            log::warn!(
                "dpkg-query 第 {} 行只有 {} 个字段，已跳过: {:?}",
                lineno + 1,
                fields.len(),
                line
            );
            continue;
        };

        packages.push(Package {
            name: name.to_string(),
            architecture: architecture.to_string(),
            status: status.to_string(),
            version: version.to_string(),
            installed_size_kb: parse_installed_size(name, size),
            short_description: description.to_string(),
        });
    }

    packages
}

fn parse_installed_size(name: &str, raw: &str) -> i64 {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(size) => size,
        // 未安装的包没有 Installed-Size
        Err(_) if raw.is_empty() => {
            log::debug!("{} 没有安装大小，记为 0", name);
            0
        }
        Err(e) => {
            log::warn!("{} 的安装大小 {:?} 无法解析 ({})，记为 0", name, raw, e);
            0
        }
    }
}

/// 解析 apt list --upgradable 的输出
///
/// 不匹配的行（如 "Listing..."、空行）直接跳过；包名去掉 `/` 之后的仓库信息，
/// 例如 "libgweather-common/zesty-updates,zesty-updates" -> "libgweather-common"。
pub fn parse_apt_list_upgradable(output: &[u8]) -> Vec<Package> {
    let text = String::from_utf8_lossy(output);

    text.lines()
        .filter_map(|line| {
            let caps = UPGRADABLE_LINE.captures(line)?;
            let reference = caps.get(1)?.as_str();
            let name = reference.split('/').next().unwrap_or(reference);
            Some(Package {
                name: name.to_string(),
                status: UPGRADABLE_STATUS.to_string(),
                version: caps.get(2)?.as_str().to_string(),
                architecture: caps.get(3)?.as_str().to_string(),
                short_description: String::new(),
                installed_size_kb: 0,
            })
        })
        .collect()
}
