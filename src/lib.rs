//! # gswitch - gcloud and kubectl context switcher
//!
//! Switches the local machine's cloud CLI context in one command:
//! authentication identity, active gcloud project and kubectl credentials.
//!
//! ## Flow
//!
//! 1. Activate the `default` gcloud configuration
//! 2. Log in interactively and set `--project`, or activate the service
//!    account named by `GOOGLE_APPLICATION_CREDENTIALS`
//! 3. List the project's GKE clusters and write kubectl credentials for
//!    the first one
//!
//! All real work is delegated to `gcloud`; gswitch only sequences it.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gcloud;
pub mod output;
pub mod runner;
pub mod switch;

// Re-export commonly used items
pub use config::{Args, AuthMode, RunOptions, Tools};
pub use error::{RunError, SwitchError};
pub use gcloud::Cluster;
pub use runner::{Runner, SystemRunner};
pub use switch::{Outcome, Switcher, Warning};
