use thiserror::Error;

#[derive(Debug, Error)]
pub enum Status {
    #[error("{0}: Not a directory!")]
    NotADirectory(String),
    #[error("No CSV file in {0}")]
    NoInputFiles(String),
    #[error("None of the {0} flights could be converted")]
    NoFlightConverted(usize),
    #[error("Unknown timezone {0}")]
    BadTimezone(String),
}
