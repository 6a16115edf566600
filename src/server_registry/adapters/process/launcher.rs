//! Launcher that runs server launch scripts as detached processes.

use crate::server_registry::{
    domain::ServerDescriptor,
    ports::{LaunchedProcess, ProcessLauncher, ProcessLauncherError, ProcessLauncherResult},
};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info};

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Program used to execute launch scripts.
///
/// The launch script path is appended as the final argument so the process
/// table shows it, which is what the liveness probe matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInterpreter {
    program: String,
    args: Vec<String>,
}

impl ScriptInterpreter {
    /// Creates an interpreter from a program and its leading arguments.
    #[must_use]
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Parses a whitespace-separated command line such as `cmd /C`.
    ///
    /// Returns `None` when the value is blank.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut words = value.split_whitespace().map(str::to_owned);
        let program = words.next()?;
        Some(Self::new(program, words))
    }

    /// Returns the interpreter program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments placed before the script path.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for ScriptInterpreter {
    #[cfg(windows)]
    fn default() -> Self {
        Self::new("cmd", ["/C".to_owned()])
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self::new("sh", [])
    }
}

/// Launcher that spawns launch scripts through a [`ScriptInterpreter`].
///
/// Children run in the server directory with all standard streams attached
/// to the null device. On Unix each child leads its own process group; on
/// Windows it is created detached from the console.
#[derive(Debug, Clone, Default)]
pub struct ScriptProcessLauncher {
    interpreter: ScriptInterpreter,
}

impl ScriptProcessLauncher {
    /// Creates a launcher using `interpreter`.
    #[must_use]
    pub const fn new(interpreter: ScriptInterpreter) -> Self {
        Self { interpreter }
    }

    /// Returns the configured interpreter.
    #[must_use]
    pub const fn interpreter(&self) -> &ScriptInterpreter {
        &self.interpreter
    }

    fn command(&self, server: &ServerDescriptor) -> Command {
        let mut command = Command::new(&self.interpreter.program);
        command
            .args(&self.interpreter.args)
            .arg(server.launch_script().as_str())
            .current_dir(server.directory())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        #[cfg(unix)]
        command.process_group(0);

        #[cfg(windows)]
        command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);

        command
    }
}

#[async_trait]
impl ProcessLauncher for ScriptProcessLauncher {
    async fn launch(&self, server: &ServerDescriptor) -> ProcessLauncherResult<LaunchedProcess> {
        info!(server = %server.name(), path = %server.launch_script(), "spawning launch script");

        let child = self
            .command(server)
            .spawn()
            .map_err(|err| ProcessLauncherError::spawn(server.launch_script(), err))?;
        let pid = child.id().ok_or_else(|| {
            ProcessLauncherError::ExitedImmediately(server.launch_script().to_owned())
        })?;

        reap_in_background(child, server.name().to_string());
        Ok(LaunchedProcess { pid })
    }
}

// The exit is only waited on so the child does not linger as a zombie.
fn reap_in_background(mut child: Child, server: String) {
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!(%server, %status, "server process exited"),
            Err(err) => debug!(%server, error = %err, "server process could not be awaited"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sh", "sh", &[])]
    #[case("cmd /C", "cmd", &["/C"])]
    #[case("  bash   -e ", "bash", &["-e"])]
    fn parses_interpreter_command_line(
        #[case] value: &str,
        #[case] program: &str,
        #[case] args: &[&str],
    ) {
        let interpreter = ScriptInterpreter::parse(value).expect("interpreter should parse");
        assert_eq!(interpreter.program(), program);
        assert_eq!(interpreter.args(), args);
    }

    #[test]
    fn blank_interpreter_is_rejected() {
        assert!(ScriptInterpreter::parse("   ").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_interpreter_is_a_spawn_failure() {
        use crate::server_registry::domain::{LaunchScriptKind, ServerMetadata, ServerName};

        let temp = tempfile::tempdir().expect("temp dir should be created");
        let directory = camino::Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("temp path should be UTF-8");
        let server = ServerDescriptor::new(
            ServerName::new("alpha").expect("valid server name"),
            directory,
            LaunchScriptKind::Start,
            ServerMetadata::default(),
        );
        let launcher = ScriptProcessLauncher::new(ScriptInterpreter::new(
            "/nonexistent/launchpad/interpreter",
            [],
        ));

        let result = launcher.launch(&server).await;

        assert!(matches!(result, Err(ProcessLauncherError::Spawn { .. })));
    }
}
