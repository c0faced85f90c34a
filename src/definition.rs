//! Job definition files.
//!
//! A definition describes a job declaratively in TOML or JSON:
//!
//! ```toml
//! name = "job1"
//!
//! [hardware]
//! core_type = "emerald_max"
//! cores_per_slot = 1
//! slots = 1
//!
//! [[analyses]]
//! software = "abaqus"
//! version = "2022-2328"
//! command = "abaqus j=job1.inp interactive"
//! license_server = "27101@license-host"
//! input_files = [{ path = "job1.inp" }, { id = "zNXApj" }]
//! ```
//!
//! Relative paths resolve against the definition file's directory. A path or
//! id listed more than once becomes one shared [`File`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::JobError;
use crate::model::{Abaqus, Analysis, CondaScript, File, Hardware, Job};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    #[serde(default)]
    pub hardware: Hardware,
    #[serde(default)]
    pub analyses: Vec<AnalysisDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "software", rename_all = "snake_case")]
pub enum AnalysisDefinition {
    Abaqus {
        version: String,
        command: String,
        #[serde(default)]
        input_files: Vec<FileDefinition>,
        license_server: String,
    },
    CondaScript {
        version: String,
        command: String,
        #[serde(default)]
        input_files: Vec<FileDefinition>,
        environment: String,
    },
}

/// One input file: `{ path = "..." }` or `{ id = "..." }`, never both.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum FileDefinition {
    Remote { id: String },
    Local { path: PathBuf },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileDefinition {
    id: Option<String>,
    path: Option<PathBuf>,
}

impl<'de> Deserialize<'de> for FileDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawFileDefinition::deserialize(deserializer)?;
        match (raw.id, raw.path) {
            (Some(id), None) => Ok(FileDefinition::Remote { id }),
            (None, Some(path)) => Ok(FileDefinition::Local { path }),
            (Some(_), Some(_)) => Err(de::Error::custom(
                "input file has both `path` and `id`; give exactly one",
            )),
            (None, None) => Err(de::Error::custom("input file needs a `path` or an `id`")),
        }
    }
}

impl JobDefinition {
    /// Read a definition, choosing the format from the file extension
    /// (`.json`, otherwise TOML).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("invalid job definition in {}", path.display()))
        } else {
            toml::from_str(&contents)
                .with_context(|| format!("invalid job definition in {}", path.display()))
        }
    }

    /// Load a definition and build the job it describes.
    pub fn load_job(path: &Path) -> Result<Job> {
        let definition = Self::load(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(definition.into_job(base_dir)?)
    }

    /// Build a DRAFT job. Local paths must exist.
    pub fn into_job(self, base_dir: &Path) -> Result<Job, JobError> {
        let mut files = FileTable::new(base_dir);
        let mut job = Job::new(self.name, self.hardware);
        for analysis in self.analyses {
            job.add_analysis(analysis.build(&mut files)?);
        }
        Ok(job)
    }
}

impl AnalysisDefinition {
    fn build(self, files: &mut FileTable) -> Result<Box<dyn Analysis>, JobError> {
        let analysis: Box<dyn Analysis> = match self {
            AnalysisDefinition::Abaqus {
                version,
                command,
                input_files,
                license_server,
            } => Box::new(Abaqus::new(
                version,
                command,
                files.resolve_all(input_files)?,
                license_server,
            )),
            AnalysisDefinition::CondaScript {
                version,
                command,
                input_files,
                environment,
            } => Box::new(CondaScript::new(
                version,
                command,
                files.resolve_all(input_files)?,
                environment,
            )),
        };
        Ok(analysis)
    }
}

/// Hands out one shared [`File`] per distinct path or id.
struct FileTable<'a> {
    base_dir: &'a Path,
    seen: HashMap<FileDefinition, File>,
}

impl<'a> FileTable<'a> {
    fn new(base_dir: &'a Path) -> Self {
        Self {
            base_dir,
            seen: HashMap::new(),
        }
    }

    fn resolve_all(&mut self, defs: Vec<FileDefinition>) -> Result<Vec<File>, JobError> {
        defs.into_iter().map(|def| self.resolve(def)).collect()
    }

    fn resolve(&mut self, def: FileDefinition) -> Result<File, JobError> {
        let key = match def {
            FileDefinition::Local { path } => FileDefinition::Local {
                path: self.base_dir.join(path),
            },
            remote => remote,
        };
        if let Some(file) = self.seen.get(&key) {
            return Ok(file.clone());
        }
        let file = match &key {
            FileDefinition::Local { path } => File::from_path(path)?,
            FileDefinition::Remote { id } => File::load_from_id(id.clone()),
        };
        self.seen.insert(key, file.clone());
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_DEF: &str = r#"
        name = "job1"

        [hardware]
        core_type = "emerald_max"
        cores_per_slot = 2
        slots = 4

        [[analyses]]
        software = "abaqus"
        version = "2022-2328"
        command = "abaqus j=job1.inp interactive"
        license_server = "27101@license-host"
        input_files = [{ path = "job1.inp" }, { id = "zNXApj" }]

        [[analyses]]
        software = "conda_script"
        version = "24.1"
        command = "python post.py"
        environment = "sim"
        input_files = [{ path = "job1.inp" }]
    "#;

    #[test]
    fn toml_definition_builds_job() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("job1.inp"), "*HEADING\n").unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, TOML_DEF).unwrap();

        let job = JobDefinition::load_job(&path).unwrap();

        assert_eq!(job.name(), "job1");
        assert_eq!(job.hardware().map(Hardware::total_cores), Some(8));
        assert_eq!(job.analyses().len(), 2);
        assert_eq!(job.analyses()[1].software_code(), "miniconda");
        // job1.inp is listed twice but shared
        assert_eq!(job.files().len(), 2);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn json_definition_with_default_hardware() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(
            &path,
            r#"{
                "name": "remote-only",
                "analyses": [{
                    "software": "abaqus",
                    "version": "2024 HF4 (FlexNet Licensing)",
                    "command": "abaqus j=job1.inp interactive",
                    "license_server": "27101@license-host",
                    "input_files": [{"id": "zNXApj"}]
                }]
            }"#,
        )
        .unwrap();

        let job = JobDefinition::load_job(&path).unwrap();
        assert_eq!(job.hardware(), Some(&Hardware::default()));
        assert_eq!(job.files()[0].resolved_id().as_deref(), Some("zNXApj"));
    }

    #[test]
    fn missing_input_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, TOML_DEF).unwrap();

        let err = JobDefinition::load_job(&path).unwrap_err();
        let job_err = err.downcast_ref::<JobError>().unwrap();
        assert!(matches!(job_err, JobError::FileNotFound(p) if p.ends_with("job1.inp")));
    }

    #[test]
    fn definition_without_analyses_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, "name = \"empty\"\n").unwrap();

        let job = JobDefinition::load_job(&path).unwrap();
        assert!(job.validate().unwrap_err().has_field("analyses"));
    }

    #[test]
    fn file_with_path_and_id_is_rejected() {
        let err = toml::from_str::<JobDefinition>(
            r#"
            name = "x"
            [[analyses]]
            software = "abaqus"
            version = "2022-2328"
            command = "abaqus j=job1.inp interactive"
            license_server = "27101@license-host"
            input_files = [{ path = "/definitely/missing.inp", id = "zNX" }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("both `path` and `id`"), "{err}");
    }

    #[test]
    fn file_needs_path_or_id() {
        let err = serde_json::from_str::<FileDefinition>("{}").unwrap_err();
        assert!(err.to_string().contains("needs a `path` or an `id`"));

        let err = serde_json::from_str::<FileDefinition>(r#"{"name": "job1.inp"}"#).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn unknown_software_is_a_parse_error() {
        let err = toml::from_str::<JobDefinition>(
            r#"
            name = "x"
            [[analyses]]
            software = "fluent"
            version = "1"
            command = "run"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fluent"));
    }
}
