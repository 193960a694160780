//! 测试用的可记录执行器

#![allow(dead_code)]

use lian_apt::package_manager::{
    CommandOutput, Executor, Invocation, OutputSink, OutputSinks, StreamMode,
};
use lian_apt::{AptError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

/// 按顺序返回预设结果，并记录每一次调用
#[derive(Debug, Default)]
pub struct MockExecutor {
    pub calls: RefCell<Vec<(Invocation, Option<StreamMode>)>>,
    /// 每次 stream 调用收到的 (stdout, stderr) sink 种类
    pub sinks_seen: RefCell<Vec<(String, String)>>,
    replies: RefCell<VecDeque<Reply>>,
}

#[derive(Debug)]
pub enum Reply {
    Output(CommandOutput),
    LaunchFails,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, code: i32, stdout: &[u8], stderr: &[u8]) -> Self {
        self.replies.borrow_mut().push_back(Reply::Output(CommandOutput {
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
            code: Some(code),
        }));
        self
    }

    pub fn launch_fails(self) -> Self {
        self.replies.borrow_mut().push_back(Reply::LaunchFails);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> Invocation {
        self.calls.borrow().last().expect("no call recorded").0.clone()
    }

    fn next(&self, invocation: &Invocation) -> Result<CommandOutput> {
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Output(out)) => Ok(out),
            Some(Reply::LaunchFails) => Err(AptError::Launch {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
            None => panic!("unexpected call: {}", invocation.display()),
        }
    }
}

impl Executor for MockExecutor {
    fn capture(&self, invocation: &Invocation, mode: StreamMode) -> Result<CommandOutput> {
        self.calls.borrow_mut().push((invocation.clone(), Some(mode)));
        self.next(invocation)
    }

    fn stream(&self, invocation: &Invocation, sinks: &mut OutputSinks) -> Result<CommandOutput> {
        self.calls.borrow_mut().push((invocation.clone(), None));
        self.sinks_seen
            .borrow_mut()
            .push((format!("{:?}", sinks.stdout), format!("{:?}", sinks.stderr)));
        let output = self.next(invocation)?;
        // 与真实执行器一样把输出按行交给 Channel sink
        for (sink, bytes, prefix) in [
            (&sinks.stdout, &output.stdout, ""),
            (&sinks.stderr, &output.stderr, "⚠ "),
        ] {
            if let OutputSink::Channel(tx) = sink {
                for line in String::from_utf8_lossy(bytes).lines() {
                    let _ = tx.send(format!("{prefix}{line}"));
                }
            }
        }
        Ok(output)
    }
}

pub fn testdata(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}
