//! Runtime settings: command-line flags first, then environment variables,
//! then built-in defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use mgm_model::SchemaRegistry;
use mgm_report::TransferSettings;
use mgm_standards::{
    AllowAll, Authorizer, DigestAllowList, SCHEMA_ENV_VAR, default_schema_path, load_schema,
};

pub const ALLOWLIST_ENV_VAR: &str = "META_ALLOWLIST_PATH";
pub const USER_SALT_ENV_VAR: &str = "META_USER_SALT";
pub const UPLOAD_DIR_ENV_VAR: &str = "META_UPLOAD_DIR";
pub const REMOTE_PATH_ENV_VAR: &str = "META_REMOTE_PATH";
pub const KEY_PATH_ENV_VAR: &str = "META_KEY_PATH";

const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Values given on the command line; `None` defers to the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub schema_path: Option<PathBuf>,
    pub allowlist_path: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
    pub remote_path: Option<String>,
    pub key_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub schema_path: PathBuf,
    pub allowlist_path: Option<PathBuf>,
    pub user_salt: String,
    /// Staging directory for archive transfers.
    pub upload_dir: PathBuf,
    pub transfer: TransferSettings,
}

impl Settings {
    /// Resolve from the process environment.
    pub fn from_env(overrides: SettingsOverrides) -> Self {
        Self::resolve(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit variable lookup. Empty values count as unset.
    pub fn resolve<F>(overrides: SettingsOverrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            schema_path: overrides
                .schema_path
                .or_else(|| var(SCHEMA_ENV_VAR).map(PathBuf::from))
                .unwrap_or_else(default_schema_path),
            allowlist_path: overrides
                .allowlist_path
                .or_else(|| var(ALLOWLIST_ENV_VAR).map(PathBuf::from)),
            user_salt: var(USER_SALT_ENV_VAR).unwrap_or_default(),
            upload_dir: overrides
                .upload_dir
                .or_else(|| var(UPLOAD_DIR_ENV_VAR).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            transfer: TransferSettings {
                remote_path: overrides.remote_path.or_else(|| var(REMOTE_PATH_ENV_VAR)),
                key_path: overrides
                    .key_path
                    .or_else(|| var(KEY_PATH_ENV_VAR).map(PathBuf::from)),
            },
        }
    }

    pub fn load_registry(&self) -> Result<SchemaRegistry> {
        load_schema(&self.schema_path)
            .with_context(|| format!("load schema {}", self.schema_path.display()))
    }

    /// The configured allow-list, or [`AllowAll`] when none is set.
    pub fn authorizer(&self) -> Result<Box<dyn Authorizer>> {
        match &self.allowlist_path {
            Some(path) => {
                let list = DigestAllowList::load(path, self.user_salt.clone())
                    .with_context(|| format!("load allow-list {}", path.display()))?;
                Ok(Box::new(list))
            }
            None => {
                warn!("no allow-list configured, every user is accepted");
                Ok(Box::new(AllowAll))
            }
        }
    }
}
