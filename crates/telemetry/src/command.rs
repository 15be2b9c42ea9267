//! External command runner with a hard timeout.

use std::process::{Output, Stdio};
use std::time::Duration;

use crate::access::CommandRunner;
use crate::error::{Reading, Unavailable};

/// Runs commands on a throwaway current-thread tokio runtime.
///
/// The child is spawned with `kill_on_drop`, so an expired timeout also
/// reaps the process. Inside an async context the runtime lives on a scoped
/// worker thread, since a runtime cannot be started on a thread that is
/// already driving one.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    timeout: Duration,
}

type Outcome = Result<std::io::Result<Output>, tokio::time::error::Elapsed>;

impl TokioCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn block_on_output(&self, program: &str, args: &[&str]) -> Reading<Outcome> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Unavailable::from_io("tokio runtime", &e))?;

        Ok(runtime.block_on(async {
            let mut cmd = tokio::process::Command::new(program);
            cmd.args(args)
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true);
            tokio::time::timeout(self.timeout, cmd.output()).await
        }))
    }
}

impl CommandRunner for TokioCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Reading<String> {
        let line = command_line(program, args);
        tracing::trace!(command = %line, "spawning");

        let result = if tokio::runtime::Handle::try_current().is_ok() {
            std::thread::scope(|scope| {
                scope
                    .spawn(|| self.block_on_output(program, args))
                    .join()
                    .unwrap_or_else(|_| {
                        Err(Unavailable::SourceUnavailable(format!(
                            "`{line}` worker thread panicked"
                        )))
                    })
            })
        } else {
            self.block_on_output(program, args)
        }?;

        let output = match result {
            Err(_) => {
                tracing::warn!(command = %line, timeout = ?self.timeout, "command timed out");
                return Err(Unavailable::Timeout(format!(
                    "`{line}` exceeded {:?}",
                    self.timeout
                )));
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Unavailable::SourceUnavailable(format!(
                    "`{program}` not found"
                )));
            }
            Ok(Err(e)) => return Err(Unavailable::from_io(format!("`{line}`"), &e)),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(Unavailable::SourceUnavailable(format!(
                "`{line}` exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_source_unavailable() {
        let runner = TokioCommandRunner::new(Duration::from_secs(2));
        let err = runner
            .run("hostscope-definitely-not-a-binary", &["--version"])
            .unwrap_err();
        assert_eq!(
            err,
            Unavailable::SourceUnavailable(
                "`hostscope-definitely-not-a-binary` not found".into()
            )
        );
    }

    #[test]
    fn command_line_joins_args() {
        assert_eq!(
            command_line("nvidia-smi", &["--query-gpu=temperature.gpu", "--format=csv,noheader"]),
            "nvidia-smi --query-gpu=temperature.gpu --format=csv,noheader"
        );
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout() {
        let runner = TokioCommandRunner::new(Duration::from_secs(2));
        assert_eq!(runner.run("echo", &["1920x1080"]).unwrap(), "1920x1080\n");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_unavailable() {
        let runner = TokioCommandRunner::new(Duration::from_secs(2));
        let err = runner.run("sh", &["-c", "exit 3"]).unwrap_err();
        assert_eq!(err.kind(), "source_unavailable");
        assert!(err.reason().contains("exited"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_inside_an_async_context() {
        let runner = TokioCommandRunner::new(Duration::from_secs(2));
        assert_eq!(runner.run("echo", &["hi"]).unwrap(), "hi\n");
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread")]
    async fn times_out_inside_a_multi_thread_runtime() {
        let runner = TokioCommandRunner::new(Duration::from_millis(100));
        let err = runner.run("sleep", &["5"]).unwrap_err();
        assert_eq!(err.kind(), "timeout");
    }

    #[cfg(unix)]
    #[test]
    fn hung_command_times_out() {
        let runner = TokioCommandRunner::new(Duration::from_millis(100));
        let err = runner.run("sleep", &["5"]).unwrap_err();
        assert_eq!(err.kind(), "timeout");
    }
}
