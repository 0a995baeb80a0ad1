//! Subprocess plumbing shared by the command adapters.

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Mutex;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

/// Lines of runner output kept for error messages.
pub const OUTPUT_TAIL_LINES: usize = 20;

/// Substitute `{name}` placeholders in every argument.
pub fn expand_args(args: &[String], vars: &[(&str, &str)]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            vars.iter()
                .fold(arg.clone(), |acc, (key, value)| acc.replace(key, value))
        })
        .collect()
}

/// Build a command that is killed when its handle is dropped, so a
/// cancelled or timed-out future never leaves the process behind.
pub fn command(program: &str, args: &[String], working_dir: Option<&Path>) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }
    cmd
}

/// Last `n` lines of `text`, joined with newlines.
pub fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

/// Bounded tail shared by both output streams, in arrival order.
#[derive(Default)]
struct OutputTail(Mutex<VecDeque<String>>);

impl OutputTail {
    fn push(&self, line: &str) {
        if let Ok(mut lines) = self.0.lock() {
            if lines.len() == OUTPUT_TAIL_LINES {
                lines.pop_front();
            }
            lines.push_back(line.to_string());
        }
    }

    fn into_string(self) -> String {
        self.0
            .into_inner()
            .map(|lines| Vec::from(lines).join("\n"))
            .unwrap_or_default()
    }
}

async fn forward<R>(reader: Option<R>, tail: &OutputTail) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Ok(());
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        eprintln!("{line}");
        tail.push(line);
    }
    Ok(())
}

/// Wait for `child`, echoing its stdout and stderr to our stderr as they
/// arrive. Our stdout stays reserved for command output.
///
/// Returns the exit status and the last [`OUTPUT_TAIL_LINES`] lines seen on
/// either stream, interleaved as they arrived.
pub async fn wait_streaming(mut child: Child) -> io::Result<(ExitStatus, String)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let tail = OutputTail::default();
    tokio::try_join!(forward(stdout, &tail), forward(stderr, &tail))?;
    let status = child.wait().await?;
    Ok((status, tail.into_string()))
}

/// Wait for `child` with both streams captured.
pub async fn wait_captured(child: Child) -> io::Result<(ExitStatus, String, String)> {
    let output = child.wait_with_output().await?;
    Ok((
        output.status,
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    ))
}
