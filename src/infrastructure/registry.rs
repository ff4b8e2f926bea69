//! Registry backed by the Python environment that hosts the RAIL packages
//!
//! Discovery runs a short introspection script with the configured interpreter.
//! The script imports every `rail.*` module (which registers the stages) and
//! prints a single JSON document as its last line of output.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{RegistrySnapshot, ShellCommand};
use crate::infrastructure::traits::{CommandRunner, Registry};
use crate::infrastructure::{InfraError, InfraResult};

const DISCOVER_SCRIPT: &str = r#"
import importlib.metadata, json, pkgutil
import rail

packages = {}
for dist in importlib.metadata.distributions():
    name = dist.metadata["Name"] or ""
    if name.lower().startswith(("pz-rail", "rail")):
        packages[name] = dist.version

namespaces, modules = [], []
for info in pkgutil.walk_packages(rail.__path__, "rail.", onerror=lambda _: None):
    modules.append(info.name)
    if info.ispkg and info.name.count(".") == 1:
        namespaces.append(info.name)

try:
    import rail.stages
    rail.stages.import_and_attach_all()
except Exception:
    pass

stages = []
try:
    from rail.core.stage import RailStage
    for name, entry in sorted(RailStage.pipeline_stages.items()):
        cls = entry[0] if isinstance(entry, tuple) else entry
        stages.append({"name": name, "module": cls.__module__})
except Exception:
    pass

print(json.dumps({
    "packages": dict(sorted(packages.items())),
    "namespaces": sorted(namespaces),
    "modules": sorted(modules),
    "stages": stages,
}))
"#;

/// Registry that asks a Python interpreter what is installed.
pub struct PythonRegistry {
    cmd: Arc<dyn CommandRunner>,
    python: String,
}

impl PythonRegistry {
    pub fn new(cmd: Arc<dyn CommandRunner>, python: impl Into<String>) -> Self {
        Self {
            cmd,
            python: python.into(),
        }
    }
}

impl Registry for PythonRegistry {
    #[instrument(skip(self), fields(python = %self.python))]
    fn discover(&self) -> InfraResult<RegistrySnapshot> {
        let command = ShellCommand::tool(&self.python).args(["-c", DISCOVER_SCRIPT]);
        let output = self
            .cmd
            .run(&command.program, &command.args_str())
            .map_err(|e| InfraError::io(format!("run {}", self.python), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("no error output");
            return Err(InfraError::registry(exit_message(
                &self.python,
                output.status.code(),
                last_line,
            )));
        }

        let snapshot = parse_snapshot(&String::from_utf8_lossy(&output.stdout))?;
        debug!(
            "discover: {} packages, {} modules, {} stages",
            snapshot.packages.len(),
            snapshot.modules.len(),
            snapshot.stages.len()
        );
        Ok(snapshot)
    }
}

fn exit_message(python: &str, code: Option<i32>, last_line: &str) -> String {
    match code {
        Some(code) => format!("{python} exited with {code}: {last_line}"),
        None => format!("{python} was terminated by a signal: {last_line}"),
    }
}

/// Parse the JSON document on the last non-empty line of `stdout`.
///
/// Module imports may print their own chatter before it.
pub fn parse_snapshot(stdout: &str) -> InfraResult<RegistrySnapshot> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| InfraError::registry("no output from interpreter"))?;
    serde_json::from_str(line).map_err(|e| InfraError::registry(format!("bad snapshot: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{RecordingCommandRunner, Reply};

    #[test]
    fn given_chatter_before_json_when_parse_then_uses_last_line() {
        let stdout = r#"Warning: something noisy
{"packages": {"pz-rail-base": "1.0.3"}, "namespaces": ["rail.core"], "modules": ["rail.core", "rail.core.stage"], "stages": [{"name": "Hist", "module": "rail.estimation.algos.hist"}]}
"#;
        let snapshot = parse_snapshot(stdout).unwrap();

        assert_eq!(
            snapshot.packages.get("pz-rail-base").map(String::as_str),
            Some("1.0.3")
        );
        assert_eq!(snapshot.namespaces, vec!["rail.core"]);
        assert_eq!(snapshot.modules.len(), 2);
        assert_eq!(snapshot.stages[0].name, "Hist");
    }

    #[test]
    fn given_missing_fields_when_parse_then_defaults() {
        let snapshot = parse_snapshot("{}").unwrap();
        assert_eq!(snapshot, RegistrySnapshot::default());
    }

    #[test]
    fn given_failing_interpreter_when_discover_then_message_carries_exit_code() {
        let runner = Arc::new(RecordingCommandRunner::with_replies([Reply::code(1)]));
        let registry = PythonRegistry::new(runner.clone(), "python3");

        let err = registry.discover().unwrap_err();

        assert_eq!(
            err.to_string(),
            "registry discovery failed: python3 exited with 1: no error output"
        );
        assert!(runner.calls()[0].starts_with("python3 -c "));
    }

    #[test]
    fn given_missing_interpreter_when_discover_then_io_error() {
        let runner = Arc::new(RecordingCommandRunner::with_replies([Reply::NotFound]));
        let registry = PythonRegistry::new(runner, "python3");

        assert!(matches!(registry.discover(), Err(InfraError::Io { .. })));
    }

    #[test]
    fn given_empty_output_when_parse_then_error() {
        assert!(matches!(
            parse_snapshot("\n\n"),
            Err(InfraError::Registry { .. })
        ));
        assert!(parse_snapshot("not json").is_err());
    }
}
