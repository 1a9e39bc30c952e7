//! Credential resolution for the Firestore client.
//!
//! Order: explicit `FIREBASE_CREDENTIALS` file (must exist), then the bundled
//! `firebase-service-account.json`, then application default credentials.

use crate::config::Settings;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Conventional name of the service-account key shipped with a deployment.
pub const BUNDLED_CREDENTIALS_FILE: &str = "firebase-service-account.json";
/// Variable read by the Google client libraries for application default credentials.
pub const APPLICATION_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Default-project variables, in lookup order.
pub const PROJECT_ENV_VARS: &[&str] = &["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT", "GCP_PROJECT"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    File(PathBuf),
    Bundled(PathBuf),
    /// Left to the client SDK (environment variable, gcloud login, metadata server).
    ApplicationDefault,
}

/// The subset of a Google credentials JSON file this service reads.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub quota_project_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedCredentials {
    pub source: CredentialSource,
    pub project_id: Option<String>,
}

pub fn resolve_credentials(settings: &Settings) -> Result<ResolvedCredentials, ConfigError> {
    resolve_credentials_with(settings, |key| std::env::var(key).ok())
}

/// Same as [`resolve_credentials`] with an explicit environment lookup.
pub fn resolve_credentials_with<F>(settings: &Settings, env: F) -> Result<ResolvedCredentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (source, key) = if let Some(path) = &settings.credentials_path {
        if !path.exists() {
            return Err(ConfigError::CredentialsFileNotFound(path.clone()));
        }
        tracing::info!(path = %path.display(), "loading credentials from configured path");
        (CredentialSource::File(path.clone()), Some(load_key(path)?))
    } else {
        let bundled = settings.resource_dir.join(BUNDLED_CREDENTIALS_FILE);
        if bundled.is_file() {
            tracing::info!(path = %bundled.display(), "loading bundled credentials");
            let key = load_key(&bundled)?;
            (CredentialSource::Bundled(bundled), Some(key))
        } else {
            tracing::info!("loading application default credentials");
            (CredentialSource::ApplicationDefault, None)
        }
    };

    let project_id = resolve_project_id(key.as_ref(), &env);
    Ok(ResolvedCredentials { source, project_id })
}

pub fn load_key(path: &Path) -> Result<ServiceAccountKey, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCredentials {
        path: path.to_path_buf(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))
}

/// Project id from the loaded key, else the environment's default project, else none.
fn resolve_project_id<F>(key: Option<&ServiceAccountKey>, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |v: &String| !v.trim().is_empty();

    if let Some(id) = key.and_then(|k| k.project_id.clone()).filter(non_blank) {
        tracing::debug!(project_id = %id, "project id taken from credentials");
        return Some(id);
    }

    for &var in PROJECT_ENV_VARS {
        if let Some(id) = env(var).filter(non_blank) {
            tracing::debug!(project_id = %id, source = var, "project id taken from environment");
            return Some(id);
        }
    }

    if let Some(path) = env(APPLICATION_CREDENTIALS_ENV).filter(non_blank) {
        match load_key(Path::new(&path)) {
            Ok(adc) => {
                if let Some(id) = adc.project_id.or(adc.quota_project_id).filter(non_blank) {
                    tracing::debug!(project_id = %id, "project id taken from application default credentials");
                    return Some(id);
                }
            }
            Err(e) => tracing::debug!(error = %e, "application default credentials file unreadable"),
        }
    }

    tracing::warn!("could not determine the Firestore project id from the available credentials");
    None
}
