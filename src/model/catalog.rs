//! Per-software version catalogs.
//!
//! A [`VersionCatalog`] maps human-readable version labels to the codes the
//! platform expects in a job document. Each software's list is fetched on
//! first use and kept for the rest of the process; concurrent first accesses
//! share a single request. When the platform cannot be reached, software
//! with a built-in table ([`Software::BUILTIN_VERSIONS`]) falls back to it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::JobError;
use crate::model::analysis::{Abaqus, Software, builtin_versions};
use crate::platform::{Transport, TransportError, VersionEntry};

const HINT_LIMIT: usize = 5;

type Versions = Arc<[VersionEntry]>;

#[derive(Default)]
pub struct VersionCatalog {
    by_software: Mutex<HashMap<String, Arc<OnceCell<Versions>>>>,
}

impl VersionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog preloaded with every built-in version table. Lookups for
    /// those software never reach the platform.
    pub fn with_builtin() -> Self {
        let catalog = Self::new();
        catalog.seed_builtin::<Abaqus>();
        catalog
    }

    /// The catalog shared by every session in this process.
    pub fn global() -> Arc<VersionCatalog> {
        static GLOBAL: OnceLock<Arc<VersionCatalog>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(VersionCatalog::new())).clone()
    }

    fn cell(&self, software: &str) -> Arc<OnceCell<Versions>> {
        let mut map = self
            .by_software
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(software.to_string()).or_default().clone()
    }

    /// Install a version list without asking the platform.
    /// Returns `false` if the software's list was already loaded.
    pub fn seed(&self, software: &str, entries: Vec<VersionEntry>) -> bool {
        self.cell(software).set(entries.into()).is_ok()
    }

    /// Install `S`'s built-in table. Returns `false` if it has none or the
    /// list was already loaded.
    pub fn seed_builtin<S: Software>(&self) -> bool {
        !S::BUILTIN_VERSIONS.is_empty()
            && self.seed(S::CODE, builtin_entries(S::BUILTIN_VERSIONS))
    }

    pub fn is_loaded(&self, software: &str) -> bool {
        self.cell(software).initialized()
    }

    /// Ordered version list for `software`, fetched on first access.
    pub async fn versions<T: Transport + ?Sized>(
        &self,
        transport: &T,
        software: &str,
    ) -> Result<Versions, JobError> {
        let cell = self.cell(software);
        match cell
            .get_or_try_init(|| fetch_versions(transport, software))
            .await
        {
            Ok(versions) => Ok(versions.clone()),
            Err(JobError::Transport(TransportError::Network(e)))
                if !builtin_versions(software).is_empty() =>
            {
                // Not cached: the next access asks the platform again.
                warn!(software, error = %e, "platform unreachable, using built-in versions");
                Ok(builtin_entries(builtin_versions(software)).into())
            }
            Err(e) => Err(e),
        }
    }

    /// Map a human-readable label to the platform's version code.
    pub async fn code_for_label<T: Transport + ?Sized>(
        &self,
        transport: &T,
        software: &str,
        label: &str,
    ) -> Result<String, JobError> {
        let versions = self.versions(transport, software).await?;
        versions
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.code.clone())
            .ok_or_else(|| unknown_version(software, label, &versions))
    }

    /// Accept either a label or a code and return the code.
    pub async fn resolve<T: Transport + ?Sized>(
        &self,
        transport: &T,
        software: &str,
        requested: &str,
    ) -> Result<String, JobError> {
        let versions = self.versions(transport, software).await?;
        versions
            .iter()
            .find(|v| v.code == requested)
            .or_else(|| versions.iter().find(|v| v.label == requested))
            .map(|v| v.code.clone())
            .ok_or_else(|| unknown_version(software, requested, &versions))
    }
}

async fn fetch_versions<T: Transport + ?Sized>(
    transport: &T,
    software: &str,
) -> Result<Versions, JobError> {
    let endpoint = format!("software/{software}/versions/");
    let body = transport.get_json(&endpoint).await?;
    let entries: Vec<VersionEntry> = serde_json::from_value(body)
        .map_err(|e| TransportError::unexpected(&endpoint, e.to_string()))?;
    debug!(software, count = entries.len(), "loaded version catalog");
    Ok(entries.into())
}

fn builtin_entries(table: &[(&str, &str)]) -> Vec<VersionEntry> {
    table
        .iter()
        .map(|(label, code)| VersionEntry {
            label: label.to_string(),
            code: code.to_string(),
        })
        .collect()
}

fn unknown_version(software: &str, requested: &str, versions: &[VersionEntry]) -> JobError {
    JobError::UnknownVersion {
        software: software.to_string(),
        version: requested.to_string(),
        available: versions
            .iter()
            .take(HINT_LIMIT)
            .map(|v| v.label.clone())
            .collect(),
    }
}
