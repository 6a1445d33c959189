//! The switch itself: authenticate, select a project, then point kubectl at
//! the first cluster of that project.

use std::fmt;

use tracing::info;

use crate::config::{AuthMode, GCLOUD_PROBE, KUBECTL_PROBE, RunOptions};
use crate::credentials::read_credentials;
use crate::error::SwitchError;
use crate::gcloud::{Cluster, Gcloud};
use crate::output::print_warning;
use crate::runner::Runner;

/// Non-fatal conditions reported while switching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    ConfigurationNotActivated { name: String, reason: String },
    KubectlMissing,
    MultipleClusters { count: usize },
    NoClusters { project: Option<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ConfigurationNotActivated { name, reason } => write!(
                f,
                "Can't switch to {} configuration. Command finished with error: {}",
                name, reason
            ),
            Warning::KubectlMissing => {
                write!(f, "kubectl is not installed. Skipping its configuration")
            }
            Warning::MultipleClusters { count } => write!(
                f,
                "{} clusters are available to configure. Configuring first one",
                count
            ),
            Warning::NoClusters { project } => write!(
                f,
                "No kubernetes clusters discovered in project {}. Skipping kubectl configuration",
                project.as_deref().unwrap_or("(unset)")
            ),
        }
    }
}

/// How a switch that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// gcloud and kubectl both point at the new context.
    Switched {
        project: Option<String>,
        cluster: Cluster,
    },
    /// gcloud was switched; kubectl is not installed.
    KubectlMissing,
    /// gcloud was switched; the project has no clusters.
    NoClusters { project: Option<String> },
}

/// Runs one switch against a [`Runner`].
///
/// Fatal conditions come back as `Err` without running any later step.
/// Warnings are printed as they happen and kept for inspection.
pub struct Switcher<'a, R: Runner> {
    runner: &'a R,
    options: &'a RunOptions,
    warnings: Vec<Warning>,
}

impl<'a, R: Runner> Switcher<'a, R> {
    pub fn new(runner: &'a R, options: &'a RunOptions) -> Self {
        Self {
            runner,
            options,
            warnings: Vec::new(),
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    fn warn(&mut self, warning: Warning) {
        print_warning(&warning.to_string());
        self.warnings.push(warning);
    }

    pub fn run(&mut self) -> Result<Outcome, SwitchError> {
        let runner = self.runner;
        let options = self.options;
        let tools = &options.tools;

        if !runner.is_installed(&tools.gcloud, GCLOUD_PROBE) {
            return Err(SwitchError::ToolMissing {
                tool: tools.gcloud.clone(),
            });
        }
        let gcloud = Gcloud::new(runner, &tools.gcloud);

        if let Err(e) = gcloud.activate_configuration(&options.configuration) {
            self.warn(Warning::ConfigurationNotActivated {
                name: options.configuration.clone(),
                reason: e.to_string(),
            });
        }

        let project = authenticate(&gcloud, options)?;

        if !runner.is_installed(&tools.kubectl, KUBECTL_PROBE) {
            self.warn(Warning::KubectlMissing);
            return Ok(Outcome::KubectlMissing);
        }

        let mut clusters = gcloud.list_clusters(options.strict)?;
        info!("Discovered {} cluster(s)", clusters.len());
        if clusters.is_empty() {
            self.warn(Warning::NoClusters {
                project: project.clone(),
            });
            return Ok(Outcome::NoClusters { project });
        }
        if clusters.len() > 1 {
            self.warn(Warning::MultipleClusters {
                count: clusters.len(),
            });
        }

        let cluster = clusters.swap_remove(0);
        gcloud.get_credentials(&cluster)?;

        Ok(Outcome::Switched { project, cluster })
    }
}

/// Logs in (or activates the service account) and selects the project.
/// Returns the project now active, if known.
fn authenticate<R: Runner>(
    gcloud: &Gcloud<'_, R>,
    options: &RunOptions,
) -> Result<Option<String>, SwitchError> {
    match &options.auth {
        AuthMode::ServiceAccount => {
            let path = options.credentials_path()?;
            let creds = read_credentials(path, options.strict)?;
            gcloud.activate_service_account(path, &creds.project_id)?;
            Ok(Some(creds.project_id).filter(|p| !p.is_empty()))
        }
        AuthMode::Interactive {
            skip_login,
            no_launch_browser,
            project,
        } => {
            if !skip_login {
                gcloud.login(*no_launch_browser)?;
            }
            match project {
                Some(p) => {
                    gcloud.set_project(p)?;
                    Ok(Some(p.clone()))
                }
                None => Ok(gcloud.active_project()),
            }
        }
    }
}
