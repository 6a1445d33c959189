//! Service-account key file reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::SwitchError;

/// The part of a service-account key file gswitch cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountCredentials {
    #[serde(default)]
    pub project_id: String,
}

impl ServiceAccountCredentials {
    /// Parses key file contents, falling back to an empty project id.
    pub fn parse_lenient(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(creds) => creds,
            Err(e) => {
                warn!("ignoring malformed credentials file: {}", e);
                Self::default()
            }
        }
    }
}

/// Reads the project id out of the key file at `path`.
///
/// The file is closed before decoding starts. With `strict`, undecodable
/// contents are an error instead of an empty project id.
pub fn read_credentials(
    path: &Path,
    strict: bool,
) -> Result<ServiceAccountCredentials, SwitchError> {
    let read_err = |source| SwitchError::CredentialsRead {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = Vec::new();
    {
        let mut file = File::open(path).map_err(read_err)?;
        file.read_to_end(&mut bytes).map_err(read_err)?;
    }

    if strict {
        serde_json::from_slice(&bytes).map_err(|source| SwitchError::CredentialsParse {
            path: path.to_path_buf(),
            source,
        })
    } else {
        Ok(ServiceAccountCredentials::parse_lenient(&bytes))
    }
}
