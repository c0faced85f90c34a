pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::RescaleClient;
pub use error::TransportError;
pub use transport::Transport;
pub use types::{
    AnalysisRef, FileRef, IdResponse, JobAnalysisPayload, JobDocument, StatusResponse,
    VersionEntry,
};
