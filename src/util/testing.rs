//! Test support: logging setup and doubles for the I/O boundary traits

use std::collections::VecDeque;
use std::env;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::RegistrySnapshot;
use crate::infrastructure::traits::{CommandRunner, Registry};
use crate::infrastructure::{InfraError, InfraResult};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["config", "walkdir"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// What a [`RecordingCommandRunner`] answers for one invocation.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Exit with this code and stdout
    Exit { code: i32, stdout: String },
    /// Killed by a signal
    Killed,
    /// Program could not be started
    NotFound,
}

impl Reply {
    pub fn code(code: i32) -> Self {
        Reply::Exit {
            code,
            stdout: String::new(),
        }
    }
}

/// Command runner that records every invocation and replays scripted replies.
///
/// Once the scripted replies are used up every call exits with 0.
#[derive(Debug, Default)]
pub struct RecordingCommandRunner {
    calls: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            calls: Mutex::default(),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    /// Every invocation so far, as `program arg1 arg2 ...`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn next_reply(&self, cmd: &str, args: &[&str]) -> Reply {
        let mut line = cmd.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line);
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or(Reply::code(0))
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        match self.next_reply(cmd, args) {
            Reply::Exit { code, stdout } => Ok(Output {
                status: exit_status(code),
                stdout: stdout.into_bytes(),
                stderr: Vec::new(),
            }),
            Reply::Killed => Ok(Output {
                status: exit_status(1),
                stdout: Vec::new(),
                stderr: b"killed".to_vec(),
            }),
            Reply::NotFound => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{cmd}: not found"),
            )),
        }
    }

    fn status(&self, cmd: &str, args: &[&str]) -> io::Result<Option<i32>> {
        match self.next_reply(cmd, args) {
            Reply::Exit { code, .. } => Ok(Some(code)),
            Reply::Killed => Ok(None),
            Reply::NotFound => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{cmd}: not found"),
            )),
        }
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Registry returning a fixed snapshot (or a fixed failure).
#[derive(Debug, Default)]
pub struct StaticRegistry {
    snapshot: Option<RegistrySnapshot>,
    discoveries: Mutex<usize>,
}

impl StaticRegistry {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            discoveries: Mutex::new(0),
        }
    }

    /// A registry whose discovery always fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// How often `discover()` was called.
    pub fn discoveries(&self) -> usize {
        self.discoveries.lock().map(|d| *d).unwrap_or_default()
    }
}

impl Registry for StaticRegistry {
    fn discover(&self) -> InfraResult<RegistrySnapshot> {
        if let Ok(mut d) = self.discoveries.lock() {
            *d += 1;
        }
        self.snapshot
            .clone()
            .ok_or_else(|| InfraError::registry("no interpreter"))
    }
}

/// Write `content` to `dir/name`, creating parents, and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir {parent:?}: {e}"));
    }
    std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {path:?}: {e}"));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_scripted_replies_when_status_then_replays_in_order() {
        let runner = RecordingCommandRunner::with_replies([Reply::code(3), Reply::Killed]);

        assert_eq!(runner.status("a", &["x"]).unwrap(), Some(3));
        assert_eq!(runner.status("b", &[]).unwrap(), None);
        assert_eq!(runner.status("c", &[]).unwrap(), Some(0));
        assert_eq!(runner.calls(), vec!["a x", "b", "c"]);
    }

    #[cfg(unix)]
    #[test]
    fn given_exit_reply_when_run_then_status_carries_code() {
        let runner = RecordingCommandRunner::with_replies([Reply::Exit {
            code: 2,
            stdout: "out".into(),
        }]);
        let output = runner.run("python", &["-c", "pass"]).unwrap();
        assert_eq!(output.status.code(), Some(2));
        assert_eq!(output.stdout, b"out");
    }
}
