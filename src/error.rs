//! Error types for gswitch.
//!
//! Every variant of [`SwitchError`] is fatal: `main` prints it with the
//! `Error:` prefix and exits non-zero. Conditions that only warn live in
//! [`crate::switch::Warning`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single external command.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl RunError {
    /// Builds an exit error, trimming captured stderr.
    pub fn exit(program: &str, code: Option<i32>, stderr: &[u8]) -> Self {
        RunError::Exit {
            program: program.to_string(),
            code,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Fatal errors that abort the switch.
#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("{tool} is not installed or can't be found in PATH. Nothing to configure")]
    ToolMissing { tool: String },

    #[error(
        "Could not find default credentials. See \
        https://developers.google.com/accounts/docs/application-default-credentials \
        for more information"
    )]
    CredentialsUnset,

    #[error("Could not read credentials file {path:?}: {source}")]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse credentials file {path:?}: {source}")]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("gcloud authentication request finished with error: {0}")]
    Login(#[source] RunError),

    #[error("gcloud set project finished with error: {0}")]
    SetProject(#[source] RunError),

    #[error("gcloud configuration finished with error: {0}")]
    ServiceAccount(#[source] RunError),

    #[error("'gcloud container clusters list' finished with error: {0}")]
    ListClusters(#[source] RunError),

    #[error("Could not parse 'gcloud container clusters list' output: {0}")]
    ClusterListParse(#[source] serde_json::Error),

    #[error("kubectl configuration finished with error: {0}")]
    GetCredentials(#[source] RunError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_missing_message() {
        let err = SwitchError::ToolMissing {
            tool: "gcloud".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "gcloud is not installed or can't be found in PATH. Nothing to configure"
        );
    }

    #[test]
    fn test_credentials_unset_mentions_docs() {
        let msg = SwitchError::CredentialsUnset.to_string();
        assert!(msg.starts_with("Could not find default credentials."));
        assert!(msg.contains("application-default-credentials"));
    }

    #[test]
    fn test_exit_error_includes_stderr() {
        let err = RunError::exit("gcloud", Some(1), b"  ERROR: denied\n");
        assert_eq!(err.to_string(), "'gcloud' exited with status 1: ERROR: denied");
    }

    #[test]
    fn test_exit_error_without_stderr() {
        let err = RunError::exit("gcloud", Some(2), b"");
        assert_eq!(err.to_string(), "'gcloud' exited with status 2");
    }

    #[test]
    fn test_fatal_wraps_run_error() {
        let err = SwitchError::Login(RunError::exit("gcloud", Some(1), b""));
        assert_eq!(
            err.to_string(),
            "gcloud authentication request finished with error: 'gcloud' exited with status 1"
        );
    }
}
