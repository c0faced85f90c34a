pub mod analysis;
mod catalog;
mod file;
mod hardware;
mod job;
mod status;

pub use analysis::{Abaqus, Analysis, CondaScript, Invocation, Software};
pub use catalog::VersionCatalog;
pub use file::{File, FileSource};
pub use hardware::{DEFAULT_CORE_TYPE, Hardware};
pub use job::{Job, JobSummary};
pub use status::JobStatus;
