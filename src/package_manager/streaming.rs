//! 子进程输出的转发（install / remove / upgrade 的进度显示）

use super::parser::clean_terminal_output;
use std::fmt;
use std::io::{self, Read, Write};
use std::process::Stdio;
use tokio::sync::mpsc;

/// 子进程某一路输出的去向
#[derive(Default)]
pub enum OutputSink {
    /// 丢弃
    #[default]
    Null,
    /// 直接继承当前终端
    Inherit,
    /// 原样写入
    Writer(Box<dyn Write + Send>),
    /// 按行发送；`\r` 刷新的进度行以 "PROGRESS:" 前缀发送，stderr 行加 `⚠ ` 前缀
    Channel(mpsc::UnboundedSender<String>),
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputSink::Null => "Null",
            OutputSink::Inherit => "Inherit",
            OutputSink::Writer(_) => "Writer",
            OutputSink::Channel(_) => "Channel",
        };
        f.write_str(name)
    }
}

impl OutputSink {
    pub fn writer(w: impl Write + Send + 'static) -> Self {
        OutputSink::Writer(Box::new(w))
    }

    /// 子进程这一路 stdio 的设置；Inherit 之外都需要管道
    pub(crate) fn stdio(&self) -> Stdio {
        match self {
            OutputSink::Inherit => Stdio::inherit(),
            _ => Stdio::piped(),
        }
    }
}

/// 一次变更类操作的 stdout / stderr 去向
#[derive(Debug, Default)]
pub struct OutputSinks {
    pub stdout: OutputSink,
    pub stderr: OutputSink,
}

/// 从流中读取全部输出并转发到 sink，返回捕获的原始字节
pub(crate) fn forward_stream(
    stream: Option<impl Read>,
    sink: &mut OutputSink,
    is_stderr: bool,
) -> io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let Some(mut reader) = stream else {
        return Ok(captured);
    };

    let mut buffer = [0u8; 1024];
    let mut line_buffer: Vec<u8> = Vec::new();

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let chunk = &buffer[..n];
        captured.extend_from_slice(chunk);

        match sink {
            OutputSink::Null | OutputSink::Inherit => {}
            OutputSink::Writer(w) => {
                w.write_all(chunk)?;
                w.flush()?;
            }
            OutputSink::Channel(tx) => {
                // 按字节切行，只解码完整的行，避免多字节字符被 read 边界截断
                for &b in chunk {
                    match b {
                        b'\n' => {
                            send_line(tx, &String::from_utf8_lossy(&line_buffer), is_stderr);
                            line_buffer.clear();
                        }
                        b'\r' => {
                            // apt 的下载进度通过 \r 就地刷新
                            let cleaned = clean_terminal_output(&String::from_utf8_lossy(&line_buffer));
                            if !cleaned.trim().is_empty() {
                                let _ = tx.send(format!("PROGRESS:{}", cleaned));
                            }
                            line_buffer.clear();
                        }
                        _ => line_buffer.push(b),
                    }
                }
            }
        }
    }

    if let OutputSink::Channel(tx) = sink {
        send_line(tx, &String::from_utf8_lossy(&line_buffer), is_stderr);
    }

    Ok(captured)
}

fn send_line(tx: &mpsc::UnboundedSender<String>, raw: &str, is_stderr: bool) {
    let cleaned = clean_terminal_output(raw);
    if cleaned.trim().is_empty() {
        return;
    }
    let msg = if is_stderr {
        format!("⚠ {}", cleaned)
    } else {
        cleaned
    };
    // 接收端已关闭时忽略
    let _ = tx.send(msg);
}
