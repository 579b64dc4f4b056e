//! Error types for bpmn-diff.

use thiserror::Error;

/// Result type alias for diff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, diffing or colorizing diagrams.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A required input document was not supplied.
    #[error("missing {0} document")]
    MissingDocument(&'static str),

    /// The colorized document could not be re-serialized.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
