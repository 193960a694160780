//! 子进程执行边界

use super::command::Invocation;
use super::streaming::{forward_stream, OutputSinks};
use super::types::CommandOutput;
use crate::error::{AptError, Result};
use std::process::{Command, Stdio};

/// 捕获模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// stderr 合并进 stdout（保持交错顺序）
    Combined,
    /// 分别捕获
    Separate,
}

/// 执行外部命令。启动失败返回 `AptError::Launch`；进程结束（无论退出码）都返回 Ok。
pub trait Executor {
    /// 运行并捕获输出
    fn capture(&self, invocation: &Invocation, mode: StreamMode) -> Result<CommandOutput>;

    /// 运行并把输出转发到 sinks，同时保留一份用于出错诊断
    fn stream(&self, invocation: &Invocation, sinks: &mut OutputSinks) -> Result<CommandOutput>;
}

/// 真实系统上的执行器
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn capture(&self, invocation: &Invocation, mode: StreamMode) -> Result<CommandOutput> {
        let mut expr = duct::cmd(&invocation.program, &invocation.args).stdin_null();
        for (key, value) in &invocation.env {
            expr = expr.env(key, value);
        }
        expr = match mode {
            StreamMode::Combined => expr.stderr_to_stdout(),
            StreamMode::Separate => expr.stderr_capture(),
        };

        let output = expr
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|source| AptError::Launch {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code(),
        })
    }

    fn stream(&self, invocation: &Invocation, sinks: &mut OutputSinks) -> Result<CommandOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(sinks.stdout.stdio())
            .stderr(sinks.stderr.stdio());

        let mut child = cmd.spawn().map_err(|source| AptError::Launch {
            program: invocation.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let OutputSinks {
            stdout: out_sink,
            stderr: err_sink,
        } = sinks;

        let (all_stdout, all_stderr) = std::thread::scope(|s| {
            let stdout_handle = s.spawn(|| forward_stream(stdout, out_sink, false));
            let stderr_handle = s.spawn(|| forward_stream(stderr, err_sink, true));
            (join_reader(stdout_handle), join_reader(stderr_handle))
        });

        // 先等子进程退出，再报告转发错误，避免留下僵尸进程
        let status = child.wait().map_err(|source| AptError::Io {
            program: invocation.program.clone(),
            source,
        })?;
        let io_err = |source| AptError::Io {
            program: invocation.program.clone(),
            source,
        };

        Ok(CommandOutput {
            stdout: all_stdout.map_err(io_err)?,
            stderr: all_stderr.map_err(io_err)?,
            code: status.code(),
        })
    }
}

fn join_reader(
    handle: std::thread::ScopedJoinHandle<'_, std::io::Result<Vec<u8>>>,
) -> std::io::Result<Vec<u8>> {
    handle
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("输出读取线程崩溃")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::streaming::OutputSink;

    fn sh(script: &str) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            env: vec![("LIAN_TEST".to_string(), "42".to_string())],
        }
    }

    #[test]
    fn capture_combined_keeps_stderr() {
        let out = SystemExecutor
            .capture(&sh("echo out; echo err >&2; exit 3"), StreamMode::Combined)
            .unwrap();
        let text = String::from_utf8(out.stdout).unwrap();
        assert!(text.contains("out"));
        assert!(text.contains("err"));
        assert_eq!(out.code, Some(3));
    }

    #[test]
    fn capture_separate_and_env() {
        let out = SystemExecutor
            .capture(&sh("echo $LIAN_TEST; echo warn >&2"), StreamMode::Separate)
            .unwrap();
        assert_eq!(out.stdout, b"42\n");
        assert_eq!(out.stderr, b"warn\n");
        assert!(out.success());
    }

    #[test]
    fn missing_program_is_launch_error() {
        let inv = Invocation {
            program: "/nonexistent/lian-apt-test".to_string(),
            args: Vec::new(),
            env: Vec::new(),
        };
        let err = SystemExecutor.capture(&inv, StreamMode::Combined).unwrap_err();
        assert!(matches!(err, AptError::Launch { .. }));
        let err = SystemExecutor
            .stream(&inv, &mut OutputSinks::default())
            .unwrap_err();
        assert!(matches!(err, AptError::Launch { .. }));
    }

    #[test]
    fn stream_forwards_and_captures() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sinks = OutputSinks {
            stdout: OutputSink::Channel(tx),
            stderr: OutputSink::Null,
        };
        let out = SystemExecutor
            .stream(&sh("echo one; echo two; echo bad >&2; exit 100"), &mut sinks)
            .unwrap();
        assert_eq!(out.code, Some(100));
        assert_eq!(out.stderr, b"bad\n");
        assert_eq!(rx.try_recv().unwrap(), "one");
        assert_eq!(rx.try_recv().unwrap(), "two");
    }
}
