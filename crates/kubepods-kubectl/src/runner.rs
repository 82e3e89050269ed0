use std::process::{Command, Stdio};

use tracing::debug;

use crate::KubectlError;

/// Captured result of a finished process
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes external programs
///
/// kubectl calls go through this trait so that tests can substitute a
/// recording runner for the real process spawner.
pub trait CommandRunner: Send + Sync {
    /// Run to completion with captured stdout and stderr
    fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput, KubectlError>;

    /// Run attached to the current terminal, returning the exit code
    fn interactive(&self, program: &str, args: &[String]) -> Result<Option<i32>, KubectlError>;
}

/// Spawns real child processes
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput, KubectlError> {
        debug!(program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| KubectlError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn interactive(&self, program: &str, args: &[String]) -> Result<Option<i32>, KubectlError> {
        debug!(program, ?args, "running interactive command");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| KubectlError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = ProcessRunner
            .output("kubepods-definitely-not-a-binary", &[])
            .unwrap_err();
        match err {
            KubectlError::Spawn { program, .. } => {
                assert_eq!(program, "kubepods-definitely-not-a-binary")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn success_requires_exit_zero() {
        let ok = CommandOutput {
            code: Some(0),
            ..Default::default()
        };
        let failed = CommandOutput {
            code: Some(2),
            ..Default::default()
        };
        let signalled = CommandOutput::default();
        assert!(ok.success());
        assert!(!failed.success());
        assert!(!signalled.success());
    }
}
