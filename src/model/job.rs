use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::analysis::Analysis;
use super::file::File;
use super::hardware::Hardware;
use super::status::JobStatus;
use crate::error::{FieldError, JobError, ValidationError};
use crate::platform::{IdResponse, JobDocument, StatusResponse, Transport, TransportError};
use crate::session::{Session, decode};

/// A simulation job: one hardware request, one or more analyses and the
/// files they read, tracked from client-side draft to a terminal state.
///
/// Mutating operations take `&mut self`; callers that share a job across
/// tasks wrap it in their own lock.
#[derive(Debug)]
pub struct Job {
    name: String,
    /// `None` for a handle loaded by id, whose description is not known.
    hardware: Option<Hardware>,
    analyses: Vec<Box<dyn Analysis>>,
    id: Option<String>,
    status: JobStatus,
    status_history: Vec<JobStatus>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(name: impl Into<String>, hardware: Hardware) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            hardware: Some(hardware),
            analyses: Vec::new(),
            id: None,
            status: JobStatus::Draft,
            status_history: vec![JobStatus::Draft],
            created_at: now,
            updated_at: now,
        }
    }

    /// Handle to a job that already exists on the platform. It starts in
    /// CREATED and can be submitted or polled; its description is not loaded,
    /// so it has no hardware or analyses.
    pub fn load_from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut job = Self::new(id.clone(), Hardware::default());
        job.hardware = None;
        job.id = Some(id);
        job.status = JobStatus::Created;
        job.status_history = vec![JobStatus::Created];
        job
    }

    pub fn with_analysis(mut self, analysis: impl Analysis + 'static) -> Self {
        self.add_analysis(Box::new(analysis));
        self
    }

    pub fn add_analysis(&mut self, analysis: Box<dyn Analysis>) {
        self.analyses.push(analysis);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hardware(&self) -> Option<&Hardware> {
        self.hardware.as_ref()
    }

    pub fn analyses(&self) -> &[Box<dyn Analysis>] {
        &self.analyses
    }

    /// Platform id, `None` until [`Job::create`] succeeds.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Every status this job has held, oldest first.
    pub fn status_history(&self) -> &[JobStatus] {
        &self.status_history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Every distinct file referenced by the analyses, in first-use order.
    pub fn files(&self) -> Vec<File> {
        let mut files: Vec<File> = Vec::new();
        for file in self
            .analyses
            .iter()
            .flat_map(|a| a.invocation().input_files.iter())
        {
            if !files.iter().any(|f| f.same_as(file)) {
                files.push(file.clone());
            }
        }
        files
    }

    /// Structural checks on the whole aggregate. Every failing field is
    /// reported, not just the first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        }
        match &self.hardware {
            Some(hardware) => hardware.collect_errors("hardware", &mut errors),
            None => errors.push(missing_hardware()),
        }
        if self.analyses.is_empty() {
            errors.push(FieldError::new(
                "analyses",
                "at least one analysis is required",
            ));
        }
        for (i, analysis) in self.analyses.iter().enumerate() {
            analysis.validate(&format!("analyses[{i}]"), &mut errors);
        }
        ValidationError::check(errors)
    }

    /// Job-creation document. `version_codes` holds one resolved code per
    /// analysis, in order.
    pub(crate) fn document(&self, version_codes: &[String]) -> Result<JobDocument, JobError> {
        let Some(hardware) = &self.hardware else {
            return Err(ValidationError {
                errors: vec![missing_hardware()],
            }
            .into());
        };
        if version_codes.len() != self.analyses.len() {
            return Err(ValidationError {
                errors: vec![FieldError::new(
                    "analyses",
                    format!(
                        "{} analyses but {} version codes",
                        self.analyses.len(),
                        version_codes.len()
                    ),
                )],
            }
            .into());
        }
        let jobanalyses = self
            .analyses
            .iter()
            .zip(version_codes)
            .map(|(analysis, code)| analysis.to_payload(code, hardware))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(JobDocument {
            name: self.name.clone(),
            jobanalyses,
        })
    }

    /// Validate, upload pending files and register the job with the platform.
    ///
    /// Structural validation runs before any platform call. On any failure
    /// the job stays in DRAFT without an id. Files uploaded before a later
    /// failure keep their ids.
    pub async fn create<T: Transport>(&mut self, session: &Session<T>) -> Result<String, JobError> {
        if let Some(id) = &self.id {
            return Err(JobError::AlreadyCreated(id.clone()));
        }
        if self.status != JobStatus::Draft {
            return Err(self.invalid_state("create", JobStatus::Draft));
        }

        self.validate()?;

        let version_codes = self.resolve_versions(session).await?;

        for file in self.files() {
            session.upload(&file).await?;
        }

        let document = serde_json::to_value(self.document(&version_codes)?)?;
        let response = session
            .transport()
            .post_json("jobs/", Some(&document))
            .await?;
        let IdResponse { id } = decode("jobs/", response)?;
        if id.is_empty() {
            return Err(TransportError::unexpected("jobs/", "empty job id").into());
        }

        info!(job_id = %id, name = %self.name, "job created");
        self.id = Some(id.clone());
        self.advance(JobStatus::Created);
        Ok(id)
    }

    /// Ask the platform to run a created job.
    pub async fn submit<T: Transport>(&mut self, session: &Session<T>) -> Result<(), JobError> {
        let id = match self.status {
            JobStatus::Created => self.require_id("submit")?,
            JobStatus::Draft => return Err(self.invalid_state("submit", JobStatus::Created)),
            status => {
                return Err(JobError::AlreadyExecuted {
                    id: self.id.clone().unwrap_or_default(),
                    status,
                });
            }
        };

        session
            .transport()
            .post_json(&format!("jobs/{id}/submit/"), None)
            .await?;

        info!(job_id = %id, "job submitted");
        self.advance(JobStatus::Submitted);
        Ok(())
    }

    /// Poll the platform and move forward to the status it reports.
    ///
    /// A report that would move the job backward (or sideways between
    /// terminal states) is discarded; the current status is returned.
    pub async fn refresh_status<T: Transport>(
        &mut self,
        session: &Session<T>,
    ) -> Result<JobStatus, JobError> {
        if self.status == JobStatus::Draft {
            return Err(self.invalid_state("refresh", JobStatus::Created));
        }
        let id = self.require_id("refresh")?;

        let endpoint = format!("jobs/{id}/");
        let body = session.transport().get_json(&endpoint).await?;
        let StatusResponse { status } = decode(&endpoint, body)?;
        let reported = JobStatus::from_platform(&status).ok_or_else(|| {
            TransportError::unexpected(&endpoint, format!("unknown job status '{status}'"))
        })?;

        if !self.advance(reported) && reported != self.status {
            warn!(
                job_id = %id,
                current = %self.status,
                reported = %reported,
                "discarding stale status report"
            );
        }
        Ok(self.status)
    }

    /// Catalog code of every analysis version. A single unknown version is
    /// returned as is; several are reported together, one field each.
    async fn resolve_versions<T: Transport>(
        &self,
        session: &Session<T>,
    ) -> Result<Vec<String>, JobError> {
        let mut codes = Vec::with_capacity(self.analyses.len());
        let mut unknown = Vec::new();
        for (i, analysis) in self.analyses.iter().enumerate() {
            match session
                .resolve_version(analysis.software_code(), &analysis.invocation().version)
                .await
            {
                Ok(code) => codes.push(code),
                Err(err @ JobError::UnknownVersion { .. }) => unknown.push((i, err)),
                Err(err) => return Err(err),
            }
        }
        match unknown.len() {
            0 => Ok(codes),
            1 => Err(unknown.swap_remove(0).1),
            _ => Err(ValidationError {
                errors: unknown
                    .into_iter()
                    .map(|(i, err)| {
                        FieldError::new(format!("analyses[{i}].version"), err.to_string())
                    })
                    .collect(),
            }
            .into()),
        }
    }

    /// Move to `next` if it is later in the lifecycle. Returns whether the
    /// status changed.
    fn advance(&mut self, next: JobStatus) -> bool {
        if !self.status.can_advance_to(next) {
            return false;
        }
        info!(
            job = %self.name,
            from = %self.status,
            to = %next,
            "job status changed"
        );
        self.status = next;
        self.status_history.push(next);
        self.updated_at = Utc::now();
        true
    }

    fn require_id(&self, operation: &'static str) -> Result<String, JobError> {
        self.id
            .clone()
            .ok_or_else(|| self.invalid_state(operation, JobStatus::Created))
    }

    fn invalid_state(&self, operation: &'static str, required: JobStatus) -> JobError {
        JobError::InvalidState {
            operation,
            required,
            actual: self.status,
        }
    }
}

fn missing_hardware() -> FieldError {
    FieldError::new("hardware", "not known for a job loaded by id")
}

/// Serializable snapshot of a job, for logs and CLI output. Hardware fields
/// are left out for a job loaded by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: Option<String>,
    pub name: String,
    pub status: JobStatus,
    pub status_history: Vec<JobStatus>,
    pub software: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cores: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobSummary {
    pub fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            name: job.name.clone(),
            status: job.status,
            status_history: job.status_history.clone(),
            software: job
                .analyses
                .iter()
                .map(|a| a.software_code().to_string())
                .collect(),
            core_type: job.hardware.as_ref().map(|h| h.core_type.clone()),
            total_cores: job.hardware.as_ref().map(Hardware::total_cores),
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
