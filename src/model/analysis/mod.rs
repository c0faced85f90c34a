//! Software analyses: how one software invocation is described to the platform.
//!
//! Every supported software is a struct implementing [`Analysis`] (the
//! object-safe part used by [`Job`](crate::model::Job)) and [`Software`] (the
//! type-level identity used for version-catalog lookups). Supporting a new
//! software means adding a new struct; nothing else changes.

mod abaqus;
mod conda;

pub use abaqus::Abaqus;
pub use conda::CondaScript;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FieldError, JobError};
use crate::model::{File, FileSource, Hardware};
use crate::platform::{AnalysisRef, FileRef, JobAnalysisPayload};

/// Type-level identity of a supported software.
pub trait Software {
    /// Code the platform uses for this software, e.g. `"abaqus"`.
    const CODE: &'static str;
    const DISPLAY_NAME: &'static str;
    /// `(label, code)` pairs known without asking the platform.
    const BUILTIN_VERSIONS: &'static [(&'static str, &'static str)] = &[];
}

/// Built-in version table of the software with platform code `software`.
pub(crate) fn builtin_versions(software: &str) -> &'static [(&'static str, &'static str)] {
    if software == Abaqus::CODE {
        Abaqus::BUILTIN_VERSIONS
    } else if software == CondaScript::CODE {
        CondaScript::BUILTIN_VERSIONS
    } else {
        &[]
    }
}

/// Fields every analysis has, whatever the software.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Version label or code; resolved against the catalog at creation.
    pub version: String,
    pub command: String,
    pub input_files: Vec<File>,
}

impl Invocation {
    pub fn new(version: impl Into<String>, command: impl Into<String>, input_files: Vec<File>) -> Self {
        Self {
            version: version.into(),
            command: command.into(),
            input_files,
        }
    }

    fn collect_errors(&self, field: &str, errors: &mut Vec<FieldError>) {
        if self.version.trim().is_empty() {
            errors.push(FieldError::new(format!("{field}.version"), "must not be empty"));
        }
        if self.command.trim().is_empty() {
            errors.push(FieldError::new(format!("{field}.command"), "must not be empty"));
        }
        if self.input_files.is_empty() {
            errors.push(FieldError::new(
                format!("{field}.input_files"),
                "at least one input file is required",
            ));
        }
        for (i, file) in self.input_files.iter().enumerate() {
            if let FileSource::Local(path) = file.source() {
                if !path.is_file() {
                    errors.push(FieldError::new(
                        format!("{field}.input_files[{i}]"),
                        format!("{} no longer exists", path.display()),
                    ));
                }
            }
        }
    }

    fn file_refs(&self) -> Result<Vec<FileRef>, JobError> {
        self.input_files
            .iter()
            .map(|file| match file.resolved_id() {
                Some(id) => Ok(FileRef { id }),
                None => Err(JobError::UnresolvedFile(file.local_path().unwrap_or_default())),
            })
            .collect()
    }
}

/// One software invocation inside a job.
pub trait Analysis: fmt::Debug + Send + Sync {
    /// Platform code of the software; matches [`Software::CODE`].
    fn software_code(&self) -> &'static str;

    fn invocation(&self) -> &Invocation;

    /// Variant-specific checks, run after the shared ones.
    fn validate_variant(&self, _field: &str, _errors: &mut Vec<FieldError>) {}

    /// Environment variables the variant needs on the cluster.
    fn env_vars(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Push every failing field of this analysis into `errors`.
    fn validate(&self, field: &str, errors: &mut Vec<FieldError>) {
        self.invocation().collect_errors(field, errors);
        self.validate_variant(field, errors);
    }

    /// Serialized fragment for the job document.
    ///
    /// `version_code` is the catalog code for [`Invocation::version`]. Every
    /// input file must already be resolved.
    fn to_payload(
        &self,
        version_code: &str,
        hardware: &Hardware,
    ) -> Result<JobAnalysisPayload, JobError> {
        let invocation = self.invocation();
        Ok(JobAnalysisPayload {
            analysis: AnalysisRef {
                code: self.software_code().to_string(),
                version: version_code.to_string(),
            },
            command: invocation.command.clone(),
            hardware: hardware.clone(),
            input_files: invocation.file_refs()?,
            env_vars: self.env_vars(),
        })
    }
}
