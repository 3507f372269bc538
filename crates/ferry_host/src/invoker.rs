//! Running host tools with streamed output.
//!
//! [`BuildInvoker::run`] spawns the tool with stdout and stderr merged into
//! one pipe and returns a [`BuildOutput`] iterator. Each `next` blocks until
//! the tool writes a full line, so the caller observes progress as it
//! happens. When the pipe closes the child is reaped; a non-zero exit, or a
//! line matching a failure pattern, ends the stream with an error.

use std::io::{BufRead, BufReader, PipeReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use regex::Regex;
use tracing::debug;

use crate::error::HostError;

/// Spawns host tools and scans their output for failure markers.
#[derive(Debug, Clone)]
pub struct BuildInvoker {
    failure_patterns: Vec<Regex>,
}

impl BuildInvoker {
    /// Creates an invoker. An empty pattern list means exit-code-only
    /// failure detection.
    pub fn new(failure_patterns: &[String]) -> Result<Self, HostError> {
        let failure_patterns = failure_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| HostError::InvalidPattern {
                    pattern: p.clone(),
                    source: e,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { failure_patterns })
    }

    /// Starts `program` with `args` in `cwd`.
    pub fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> Result<BuildOutput, HostError> {
        let command = std::iter::once(program.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        let spawn_err = |e: std::io::Error| HostError::SpawnFailed {
            command: command.clone(),
            source: e,
        };

        let (reader, writer) = std::io::pipe().map_err(spawn_err)?;
        let writer_err = writer.try_clone().map_err(spawn_err)?;
        // The Command owns the write ends; it must be dropped before reading
        // or the pipe never reaches end of stream.
        let child = {
            let mut cmd = Command::new(program);
            cmd.args(args)
                .current_dir(cwd)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(writer_err);
            cmd.spawn().map_err(spawn_err)?
        };
        debug!(%command, pid = child.id(), "spawned host tool");

        Ok(BuildOutput {
            command,
            reader: BufReader::new(reader),
            child: Some(child),
            failure_patterns: self.failure_patterns.clone(),
            reported: None,
            buf: Vec::new(),
        })
    }
}

/// Lazily read output of one host tool run. Not restartable.
#[derive(Debug)]
pub struct BuildOutput {
    command: String,
    reader: BufReader<PipeReader>,
    child: Option<Child>,
    failure_patterns: Vec<Regex>,
    reported: Option<String>,
    buf: Vec<u8>,
}

impl BuildOutput {
    /// The command line being run.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Reaps the child and turns its status into the stream's final item.
    fn finish(&mut self) -> Option<Result<String, HostError>> {
        let mut child = self.child.take()?;
        let status = match child.wait() {
            Ok(status) => status,
            Err(e) => {
                return Some(Err(HostError::OutputRead {
                    command: self.command.clone(),
                    source: e,
                }));
            }
        };
        debug!(command = %self.command, %status, "host tool exited");
        if !status.success() {
            return Some(Err(HostError::BuildFailed {
                command: self.command.clone(),
                code: status.code().unwrap_or(-1),
            }));
        }
        self.reported.take().map(|line| {
            Err(HostError::BuildReported {
                command: self.command.clone(),
                line,
            })
        })
    }
}

impl Iterator for BuildOutput {
    type Item = Result<String, HostError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.child.as_ref()?;
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => self.finish(),
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                let matched = self.failure_patterns.iter().any(|p| p.is_match(&line));
                if matched && self.reported.is_none() {
                    self.reported = Some(line.clone());
                }
                Some(Ok(line))
            }
            Err(e) => {
                if let Some(mut child) = self.child.take() {
                    let _ = child.kill();
                    let _ = child.wait();
                }
                Some(Err(HostError::OutputRead {
                    command: self.command.clone(),
                    source: e,
                }))
            }
        }
    }
}

impl Drop for BuildOutput {
    fn drop(&mut self) {
        // Abandoned before end of stream: nobody drains the pipe any more.
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
