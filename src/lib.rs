//! Client library for building and tracking simulation jobs on the Rescale
//! HPC platform.
//!
//! Build a [`Job`] from a [`Hardware`] request and one or more analyses
//! ([`Abaqus`], [`CondaScript`]), then drive it through a [`Session`]:
//!
//! ```no_run
//! # async fn run() -> Result<(), rescale_jobs::JobError> {
//! use rescale_jobs::{Abaqus, File, Hardware, Job, RescaleClient, Session};
//!
//! let session = Session::new(RescaleClient::new("api-key".into())?);
//! let mut job = Job::new("job1", Hardware::new("emerald_max", 1, 1)).with_analysis(
//!     Abaqus::new(
//!         "2022-2328",
//!         "abaqus j=job1.inp interactive",
//!         vec![File::load_from_id("zNXApj")],
//!         "27101@license-host",
//!     ),
//! );
//! job.create(&session).await?;
//! job.submit(&session).await?;
//! let status = job.refresh_status(&session).await?;
//! # let _ = status;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod model;
pub mod platform;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::RescaleConfig;
pub use definition::JobDefinition;
pub use error::{FieldError, JobError, ValidationError};
pub use model::{
    Abaqus, Analysis, CondaScript, File, FileSource, Hardware, Invocation, Job, JobStatus,
    JobSummary, Software, VersionCatalog,
};
pub use platform::{RescaleClient, Transport, TransportError, VersionEntry};
pub use session::Session;
