//! Command-line arguments and the run configuration derived from them.
//!
//! Everything the switch needs is resolved once at startup into an immutable
//! [`RunOptions`] and passed by reference from there on.
//!
//! ## Testing
//!
//! The `GSWITCH_GCLOUD` and `GSWITCH_KUBECTL` environment variables override
//! the executables that get invoked, so tests can point them at stubs.

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::SwitchError;

/// Environment variable naming the service-account key file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Switch gcloud identity, project and kubectl credentials in one command.
#[derive(Parser, Debug, Clone)]
#[command(name = "gswitch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Project ID for gcloud configuration. Ignored when using a service account
    #[arg(short, long, default_value = "")]
    pub project: String,

    /// Do not authenticate user. Use previous identity
    #[arg(long)]
    pub no_auth: bool,

    /// Use service account from GOOGLE_APPLICATION_CREDENTIALS instead of a
    /// Google account. This option overrides --project and --no-auth
    #[arg(long)]
    pub use_service_account: bool,

    /// Do not launch a browser for authorization. Prints a URL to copy instead
    #[arg(long)]
    pub no_launch_browser: bool,

    /// gcloud configuration to activate before anything else
    #[arg(long, default_value = "default")]
    pub configuration: String,

    /// Treat malformed credentials or cluster list JSON as an error
    #[arg(long)]
    pub strict: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "GSWITCH_LOG_LEVEL")]
    pub log_level: String,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// gcloud executable
    #[arg(long, default_value = "gcloud", env = "GSWITCH_GCLOUD", hide = true)]
    pub gcloud_bin: String,

    /// kubectl executable
    #[arg(long, default_value = "kubectl", env = "GSWITCH_KUBECTL", hide = true)]
    pub kubectl_bin: String,
}

/// Presence probe for gcloud.
pub const GCLOUD_PROBE: &[&str] = &["version"];

/// Presence probe for kubectl. `--client` keeps it from contacting a cluster,
/// so it succeeds before any kube context exists.
pub const KUBECTL_PROBE: &[&str] = &["version", "--client"];

/// External executables invoked by the switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub gcloud: String,
    pub kubectl: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            gcloud: "gcloud".to_string(),
            kubectl: "kubectl".to_string(),
        }
    }
}

/// How the user gets authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Service-account key file; replaces login and `--project`.
    ServiceAccount,
    /// Interactive `gcloud auth login` unless `skip_login`, then optional project.
    Interactive {
        skip_login: bool,
        no_launch_browser: bool,
        project: Option<String>,
    },
}

/// Immutable configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub auth: AuthMode,
    pub configuration: String,
    pub strict: bool,
    /// Value of `GOOGLE_APPLICATION_CREDENTIALS`, `None` if unset or blank.
    pub credentials_path: Option<PathBuf>,
    pub tools: Tools,
}

impl RunOptions {
    /// Builds options from arguments and the process environment.
    pub fn from_args(args: Args) -> Self {
        Self::from_args_with_env(args, |key| env::var(key).ok())
    }

    /// Builds options from arguments, reading variables through `lookup`.
    pub fn from_args_with_env<F>(args: Args, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth = if args.use_service_account {
            AuthMode::ServiceAccount
        } else {
            AuthMode::Interactive {
                skip_login: args.no_auth,
                no_launch_browser: args.no_launch_browser,
                project: non_blank(args.project),
            }
        };

        Self {
            auth,
            configuration: args.configuration,
            strict: args.strict,
            credentials_path: lookup(CREDENTIALS_ENV)
                .and_then(non_blank)
                .map(PathBuf::from),
            tools: Tools {
                gcloud: args.gcloud_bin,
                kubectl: args.kubectl_bin,
            },
        }
    }

    /// Path of the service-account key file, required by the service-account flow.
    pub fn credentials_path(&self) -> Result<&Path, SwitchError> {
        self.credentials_path
            .as_deref()
            .ok_or(SwitchError::CredentialsUnset)
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["gswitch"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).expect("valid arguments")
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.project, "");
        assert_eq!(args.configuration, "default");
        assert!(!args.no_auth && !args.use_service_account && !args.no_launch_browser);

        let opts = RunOptions::from_args_with_env(args, no_env);
        assert_eq!(
            opts.auth,
            AuthMode::Interactive {
                skip_login: false,
                no_launch_browser: false,
                project: None,
            }
        );
        assert_eq!(opts.credentials_path, None);
    }

    #[test]
    fn test_short_project_flag() {
        let opts = RunOptions::from_args_with_env(parse(&["-p", "proj-1", "--no-auth"]), no_env);
        assert_eq!(
            opts.auth,
            AuthMode::Interactive {
                skip_login: true,
                no_launch_browser: false,
                project: Some("proj-1".to_string()),
            }
        );
    }

    #[test]
    fn test_service_account_overrides_project_and_no_auth() {
        let args = parse(&["--project", "ignored", "--no-auth", "--use-service-account"]);
        let opts = RunOptions::from_args_with_env(args, no_env);
        assert_eq!(opts.auth, AuthMode::ServiceAccount);
    }

    #[test]
    fn test_blank_credentials_env_is_unset() {
        let opts = RunOptions::from_args_with_env(parse(&[]), |_| Some("   ".to_string()));
        assert_eq!(opts.credentials_path, None);
        assert!(matches!(
            opts.credentials_path(),
            Err(SwitchError::CredentialsUnset)
        ));
    }

    #[test]
    fn test_credentials_env_is_read() {
        let opts = RunOptions::from_args_with_env(parse(&[]), |key| {
            (key == CREDENTIALS_ENV).then(|| "/tmp/key.json".to_string())
        });
        assert_eq!(opts.credentials_path, Some(PathBuf::from("/tmp/key.json")));
    }

    #[test]
    fn test_blank_project_is_none() {
        let opts = RunOptions::from_args_with_env(parse(&["-p", " "]), no_env);
        assert!(matches!(opts.auth, AuthMode::Interactive { project: None, .. }));
    }
}
