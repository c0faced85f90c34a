//! Input file references.
//!
//! A [`File`] is either a local path waiting to be uploaded or an id already
//! stored on the platform. Clones share state: when a job uploads a local
//! file, every job holding a clone sees the resolved id.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::JobError;

/// Where the content of a [`File`] lives right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Local content not yet uploaded.
    Local(PathBuf),
    /// Content stored on the platform under this id.
    Remote {
        id: String,
        /// Path the content was uploaded from, if it started out local.
        origin: Option<PathBuf>,
    },
}

#[derive(Clone)]
pub struct File {
    source: Arc<Mutex<FileSource>>,
}

impl File {
    /// Reference a local file. Fails fast unless the path is a regular file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, JobError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(JobError::FileNotFound(path.to_path_buf()));
        }
        Ok(Self::with_source(FileSource::Local(path.to_path_buf())))
    }

    /// Reference content already on the platform. No network call is made.
    pub fn load_from_id(id: impl Into<String>) -> Self {
        Self::with_source(FileSource::Remote {
            id: id.into(),
            origin: None,
        })
    }

    fn with_source(source: FileSource) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
        }
    }

    // The source is only ever replaced whole, so a poisoned lock is still valid.
    fn lock(&self) -> MutexGuard<'_, FileSource> {
        self.source.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn source(&self) -> FileSource {
        self.lock().clone()
    }

    /// Remote id, or `None` while the file is still local.
    pub fn resolved_id(&self) -> Option<String> {
        match &*self.lock() {
            FileSource::Remote { id, .. } => Some(id.clone()),
            FileSource::Local(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_id().is_some()
    }

    /// Local path, for files that started out local.
    pub fn local_path(&self) -> Option<PathBuf> {
        match &*self.lock() {
            FileSource::Local(path) => Some(path.clone()),
            FileSource::Remote { origin, .. } => origin.clone(),
        }
    }

    /// Record the id the platform assigned to this file's content.
    /// A file that is already remote keeps its existing id.
    pub(crate) fn mark_uploaded(&self, id: String) {
        let mut source = self.lock();
        if let FileSource::Local(path) = &*source {
            *source = FileSource::Remote {
                id,
                origin: Some(path.clone()),
            };
        }
    }

    /// Whether two handles point at the same shared reference.
    pub fn same_as(&self, other: &File) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("File").field(&*self.lock()).finish()
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.lock() {
            FileSource::Local(path) => write!(f, "{}", path.display()),
            FileSource::Remote { id, .. } => write!(f, "id:{id}"),
        }
    }
}
