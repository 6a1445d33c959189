//! gcloud invocations: authentication, project selection, cluster discovery
//! and kubectl credentials.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::error::{RunError, SwitchError};
use crate::runner::Runner;

/// A GKE cluster as reported by `gcloud container clusters list`.
///
/// Missing or null fields decode as empty strings so one odd entry does not
/// hide the rest of the list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cluster {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub zone: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes `clusters list --format=json` output, keeping gcloud's order.
///
/// Output that is not a JSON array of objects is an empty list unless
/// `strict` is set.
pub fn parse_clusters(bytes: &[u8], strict: bool) -> Result<Vec<Cluster>, SwitchError> {
    match serde_json::from_slice::<Vec<Cluster>>(bytes) {
        Ok(clusters) => Ok(clusters),
        Err(e) if strict => Err(SwitchError::ClusterListParse(e)),
        Err(e) => {
            warn!("ignoring undecodable cluster list: {}", e);
            Ok(Vec::new())
        }
    }
}

/// Thin wrapper over the gcloud CLI.
pub struct Gcloud<'a, R: Runner> {
    runner: &'a R,
    program: &'a str,
}

impl<'a, R: Runner> Gcloud<'a, R> {
    pub fn new(runner: &'a R, program: &'a str) -> Self {
        Self { runner, program }
    }

    /// `gcloud config configurations activate <name>`. Callers only warn on failure.
    pub fn activate_configuration(&self, name: &str) -> Result<(), RunError> {
        info!("Activating {} gcloud configuration...", name);
        self.runner
            .run(self.program, &["config", "configurations", "activate", name])
    }

    /// Interactive `gcloud auth login`.
    pub fn login(&self, no_launch_browser: bool) -> Result<(), SwitchError> {
        let mut args = vec!["auth", "login"];
        if no_launch_browser {
            args.push("--no-launch-browser");
        }
        self.runner
            .run_interactive(self.program, &args)
            .map_err(SwitchError::Login)
    }

    pub fn set_project(&self, project: &str) -> Result<(), SwitchError> {
        info!("Setting gcloud project to {}...", project);
        self.runner
            .run(self.program, &["config", "set", "project", project])
            .map_err(SwitchError::SetProject)
    }

    /// Reads the active project back, `None` if unset or unreadable.
    pub fn active_project(&self) -> Option<String> {
        let out = self
            .runner
            .output(self.program, &["config", "get-value", "project"])
            .ok()?;
        let project = String::from_utf8_lossy(&out).trim().to_string();
        if project.is_empty() || project == "(unset)" {
            None
        } else {
            Some(project)
        }
    }

    pub fn activate_service_account(
        &self,
        key_file: &Path,
        project: &str,
    ) -> Result<(), SwitchError> {
        info!("Modifying gcloud configuration...");
        let key_file = key_file.to_string_lossy();
        self.runner
            .run(
                self.program,
                &[
                    "auth",
                    "activate-service-account",
                    "--key-file",
                    &*key_file,
                    "--project",
                    project,
                ],
            )
            .map_err(SwitchError::ServiceAccount)
    }

    /// Lists the active project's clusters in the order gcloud returns them.
    pub fn list_clusters(&self, strict: bool) -> Result<Vec<Cluster>, SwitchError> {
        let out = self
            .runner
            .output(
                self.program,
                &["container", "clusters", "list", "--format=json"],
            )
            .map_err(SwitchError::ListClusters)?;
        parse_clusters(&out, strict)
    }

    /// Writes credentials for `cluster` into the kubectl configuration.
    pub fn get_credentials(&self, cluster: &Cluster) -> Result<(), SwitchError> {
        info!("Modifying kubectl configuration...");
        self.runner
            .run(
                self.program,
                &[
                    "container",
                    "clusters",
                    "get-credentials",
                    cluster.name.as_str(),
                    "--zone",
                    cluster.zone.as_str(),
                ],
            )
            .map_err(SwitchError::GetCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clusters_keeps_order() {
        let json = br#"[
            {"name": "prod", "zone": "europe-west1-b", "status": "RUNNING"},
            {"name": "dev", "zone": "us-central1-a"}
        ]"#;
        let clusters = parse_clusters(json, true).unwrap();
        assert_eq!(
            clusters,
            vec![
                Cluster {
                    name: "prod".to_string(),
                    zone: "europe-west1-b".to_string(),
                },
                Cluster {
                    name: "dev".to_string(),
                    zone: "us-central1-a".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_clusters_keeps_entries_with_null_or_missing_fields() {
        let json = br#"[
            {"name": "prod", "zone": "europe-west1-b"},
            {"name": "autopilot", "zone": null},
            {"zone": "us-east1-c"}
        ]"#;
        let clusters = parse_clusters(json, false).unwrap();
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].name, "prod");
        assert_eq!(clusters[1].name, "autopilot");
        assert_eq!(clusters[1].zone, "");
        assert_eq!(clusters[2].name, "");
        assert_eq!(clusters[2].zone, "us-east1-c");
    }

    #[test]
    fn test_parse_clusters_empty_output() {
        assert!(parse_clusters(b"", false).unwrap().is_empty());
        assert!(parse_clusters(b"[]", true).unwrap().is_empty());
    }

    #[test]
    fn test_parse_clusters_malformed_is_empty() {
        assert!(parse_clusters(b"{oops", false).unwrap().is_empty());
    }

    #[test]
    fn test_parse_clusters_malformed_fails_when_strict() {
        let err = parse_clusters(b"{oops", true).unwrap_err();
        assert!(matches!(err, SwitchError::ClusterListParse(_)));
    }
}
