//! Scenario reading and report writing for the infogain CLI.

mod error;
mod report;
mod scenario;

pub use error::IoError;
pub use report::{BestCandidate, CandidateReport, GainReport, PriorTableReport, ReportWriter};
pub use scenario::{NamedCandidate, Scenario, ScenarioReader};
