use std::io;

use kubepods_types::DecodeError;
use thiserror::Error;

/// Everything that can go wrong talking to kubectl
#[derive(Debug, Error)]
pub enum KubectlError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` {}: {stderr}", exit_text(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("no pod selected and --all not requested")]
    NoTarget,

    #[error("background task failed: {0}")]
    Task(String),
}

fn exit_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl KubectlError {
    /// Exit code of a failed command, if it exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_message_carries_code_and_stderr() {
        let err = KubectlError::Failed {
            command: "kubectl get pods -o json".into(),
            code: Some(1),
            stderr: "error: You must be logged in to the server".into(),
        };
        assert_eq!(
            err.to_string(),
            "`kubectl get pods -o json` exited with status 1: error: You must be logged in to the server"
        );
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn signal_termination_has_no_code() {
        let err = KubectlError::Failed {
            command: "kubectl exec -it web -- /bin/sh".into(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.exit_code(), None);
    }
}
