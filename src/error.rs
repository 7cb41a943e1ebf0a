use std::fmt;

use thiserror::Error;

use crate::schema::Loc;

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    /// The value had the wrong JSON shape; holds the expected type name.
    Type(&'static str),
    /// `container-title` was neither a string nor a list of strings.
    StringOrList,
    EmptyString,
    /// `date-parts` had no leading year.
    NoYear,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => f.write_str("Field required"),
            ViolationKind::Type(expected) => write!(f, "Input should be a valid {expected}"),
            ViolationKind::StringOrList => {
                f.write_str("Input should be a valid string or a list of strings")
            }
            ViolationKind::EmptyString => f.write_str("String should have at least 1 character"),
            ViolationKind::NoYear => f.write_str("Date parts should start with a year"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub loc: Loc,
    pub kind: ViolationKind,
}

/// Every reason a raw record was rejected, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationError {
    pub model: &'static str,
    pub violations: Vec<Violation>,
}

impl SchemaValidationError {
    /// Whether any violation is located at exactly `loc` (dot-joined).
    pub fn names(&self, loc: &str) -> bool {
        self.violations.iter().any(|v| v.loc.to_string() == loc)
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.violations.len();
        write!(
            f,
            "{n} validation error{} for {}",
            if n == 1 { "" } else { "s" },
            self.model
        )?;
        for v in &self.violations {
            write!(f, "\n{}\n  {}", v.loc, v.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("has no publication date")]
    MissingPublicationDate,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("gave a response code of {0}")]
    Status(u16),
    #[error("could not be reached: {0}")]
    Http(#[from] ureq::Error),
    #[error("could not be resolved to a URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("returned a body that is not JSON: {0}")]
    Body(#[from] serde_json::Error),
}

/// A failed normalize-and-render call. The display of each variant is the text handed back to
/// the caller in place of the outline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("- *ERROR* unrecognised identifier: {input}")]
    Unrecognised { input: String },
    #[error("- *ERROR* DOI {doi} {source}.")]
    Fetch {
        doi: String,
        #[source]
        source: FetchError,
    },
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
    #[error("- *ERROR* DOI {doi} {source}.")]
    Render {
        doi: String,
        #[source]
        source: RenderError,
    },
    #[error("- *ERROR* DOI {doi} could not be written as JSON: {source}.")]
    Encode {
        doi: String,
        #[source]
        source: serde_json::Error,
    },
}
