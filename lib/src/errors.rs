// Structured validation failure, reported with the offending record

use std::fmt;

/// Raised when a source record does not satisfy its schema. Carries the value
/// of the record's identifying field (or `<missing>`) plus every constraint
/// violation found, so the operator can fix the spreadsheet in one pass.
#[derive(Debug)]
pub struct ValidationFailure {
    pub source: String,
    pub record: String,
    pub problems: Vec<String>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} record '{}' did not validate: {}",
            self.source,
            self.record,
            self.problems.join("; ")
        )
    }
}

impl std::error::Error for ValidationFailure {}
