/// Errors surfaced by claim normalisation, validation and submission.
#[derive(Debug, thiserror::Error)]
pub enum ClaimsError {
    /// Required identifiers are missing. Raised before any network call.
    #[error("Missing required: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// No CSV row carries both identifiers. Raised before any network call.
    #[error(
        "Missing required ClaimID/BeneID in {count} CSV row(s), first at line(s) {}",
        .lines.iter().map(u64::to_string).collect::<Vec<_>>().join(", ")
    )]
    InvalidRows { count: usize, lines: Vec<u64> },

    /// Network or HTTP failure. Carries the server's `error` message when it sent one.
    #[error("{0}")]
    Transport(String),

    /// CSV input could not be read or contained no rows.
    #[error("{0}")]
    Parse(String),

    /// A bulk upload stopped at a failed batch. Displays as the underlying failure.
    #[error("{source}")]
    BulkAborted {
        batch_index: usize,
        inserted_before_failure: u64,
        #[source]
        source: Box<ClaimsError>,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClaimsError {
    pub fn missing_fields(fields: &[&str]) -> Self {
        ClaimsError::Validation {
            missing: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl From<csv::Error> for ClaimsError {
    fn from(err: csv::Error) -> Self {
        ClaimsError::Parse(format!("CSV error: {err}"))
    }
}

impl From<claims_types::TextError> for ClaimsError {
    fn from(err: claims_types::TextError) -> Self {
        ClaimsError::InvalidInput(err.to_string())
    }
}

pub type ClaimsResult<T> = std::result::Result<T, ClaimsError>;
