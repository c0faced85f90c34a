use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a job, from client-side draft to a terminal platform state.
///
/// DRAFT → CREATED → SUBMITTED → RUNNING → COMPLETED | FAILED, with CANCELLED
/// reachable from any non-terminal state. The machine never moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Draft,
    Created,
    Submitted,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Position in the lifecycle. Terminal states share the top rank.
    pub fn rank(self) -> u8 {
        match self {
            JobStatus::Draft => 0,
            JobStatus::Created => 1,
            JobStatus::Submitted => 2,
            JobStatus::Running => 3,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 4
    }

    /// Whether moving from `self` to `next` advances the lifecycle.
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        next.rank() > self.rank()
    }

    /// Map a status string reported by the platform onto the lifecycle.
    ///
    /// The platform uses finer-grained labels than the client tracks; queue
    /// and validation phases count as SUBMITTED, execution phases as RUNNING.
    pub fn from_platform(status: &str) -> Option<JobStatus> {
        let normalized = status.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        let status = match normalized.as_str() {
            "draft" => JobStatus::Draft,
            "created" | "not submitted" | "saved" => JobStatus::Created,
            "submitted" | "pending" | "queued" | "validated" | "waiting for queue"
            | "waiting for cluster" => JobStatus::Submitted,
            "running" | "started" | "executing" | "stopping" => JobStatus::Running,
            "completed" | "complete" | "finished" => JobStatus::Completed,
            "failed" | "error" => JobStatus::Failed,
            "cancelled" | "canceled" | "stopped" | "terminated" => JobStatus::Cancelled,
            _ => return None,
        };
        Some(status)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Draft => write!(f, "DRAFT"),
            JobStatus::Created => write!(f, "CREATED"),
            JobStatus::Submitted => write!(f, "SUBMITTED"),
            JobStatus::Running => write!(f, "RUNNING"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
            JobStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
