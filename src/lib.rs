//! lian-apt — 把 dpkg-query / apt / apt-get 的文本输出转换成结构化的包记录

pub mod config;
pub mod error;
pub mod package_manager;

pub use config::Config;
pub use error::{AptError, Result};
pub use package_manager::{AptManager, OutputSink, Package};
