/// Error types for OPC container operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    /// The archive signature or central directory is unusable. This is the
    /// only failure that aborts a parse outright.
    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("part not found: {0}")]
    MissingPart(String),

    #[error("malformed XML in {part}: {detail}")]
    MalformedXml { part: String, detail: String },

    #[error("invalid part name: {0}")]
    InvalidPartName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OpcError {
    /// Wrap an XML parse failure with the part it occurred in.
    pub fn malformed(part: impl Into<String>, err: impl std::fmt::Display) -> Self {
        OpcError::MalformedXml {
            part: part.into(),
            detail: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for OpcError {
    fn from(err: zip::result::ZipError) -> Self {
        OpcError::CorruptArchive(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
