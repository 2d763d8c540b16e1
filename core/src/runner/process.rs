use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::capture::TailBuffer;
use super::exit::{normalize_exit, terminating_signal};
use super::{CommandSpec, ProcessOutput, ProcessRunner};
use crate::error::RunnerError;
use crate::sanity::CapturedOutput;

/// Runs programs as local child processes.
#[derive(Debug, Default, Clone)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

async fn pump<R>(reader: Option<R>, limit: usize) -> std::io::Result<TailBuffer>
where
    R: AsyncRead + Unpin,
{
    let mut tail = TailBuffer::new(limit);
    let Some(mut reader) = reader else {
        return Ok(tail);
    };
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        tail.push(&chunk[..n]);
    }
    Ok(tail)
}

fn join_stream(
    stream: &'static str,
    res: Result<std::io::Result<TailBuffer>, tokio::task::JoinError>,
) -> Result<TailBuffer, RunnerError> {
    match res {
        Ok(Ok(tail)) => Ok(tail),
        Ok(Err(source)) => Err(RunnerError::StreamIo { stream, source }),
        Err(e) => Err(RunnerError::StreamIo {
            stream,
            source: std::io::Error::other(e.to_string()),
        }),
    }
}

/// Kill the child's whole process group so shell-launched workloads go with it.
#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        tracing::debug!(target: "regcheck.runner", pid, error = %e, "killpg failed");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    fn name(&self) -> &str {
        "local"
    }

    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }
        for (k, v) in &spec.env {
            cmd.env(k, v);
        }

        tracing::debug!(
            target: "regcheck.runner",
            program = %spec.program,
            args = ?spec.args,
            cwd = ?spec.cwd,
            "spawning process"
        );

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let pid = child.id();
        let mut out_task = tokio::spawn(pump(child.stdout.take(), spec.capture_bytes));
        let mut err_task = tokio::spawn(pump(child.stderr.take(), spec.capture_bytes));

        // The deadline covers the drains too: a background grandchild can keep
        // the pipes open after the direct child has exited.
        let collected = {
            let finished = async {
                let status = child.wait().await;
                let out = (&mut out_task).await;
                let err = (&mut err_task).await;
                (status, out, err)
            };
            match spec.timeout {
                Some(limit) => tokio::time::timeout(limit, finished).await.ok(),
                None => Some(finished.await),
            }
        };

        let Some((waited, out_res, err_res)) = collected else {
            let timeout_ms = spec.timeout.map(|t| t.as_millis() as u64).unwrap_or_default();
            tracing::warn!(
                target: "regcheck.runner",
                program = %spec.program,
                timeout_ms,
                "process timed out, killing its process group"
            );
            kill_group(pid);
            let _ = child.kill().await;
            out_task.abort();
            err_task.abort();
            return Err(RunnerError::Timeout {
                program: spec.program.clone(),
                timeout_ms,
            });
        };
        let status = waited.map_err(|source| RunnerError::Wait {
            program: spec.program.clone(),
            source,
        })?;

        let stdout = join_stream("stdout", out_res)?;
        let stderr = join_stream("stderr", err_res)?;
        if stdout.dropped() > 0 || stderr.dropped() > 0 {
            tracing::warn!(
                target: "regcheck.runner",
                program = %spec.program,
                stdout_dropped = stdout.dropped(),
                stderr_dropped = stderr.dropped(),
                "output exceeded capture limit, keeping tail"
            );
        }

        Ok(ProcessOutput {
            exit_code: normalize_exit(status),
            signal: terminating_signal(status),
            captured: CapturedOutput::new(stdout.to_string_lossy(), stderr.to_string_lossy()),
            duration: started.elapsed(),
        })
    }
}
