use remap_mappings::MappingError;
use thiserror::Error;

/// Result type for format loaders
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors raised while parsing a mapping file format
#[derive(Error, Debug)]
pub enum FormatError {
    /// A line matched none of the format's known shapes
    #[error("line {line_no}: unrecognized line `{line}`")]
    MalformedLine { line_no: usize, line: String },

    /// A configured namespace is absent from the header's namespace list
    #[error("namespace `{namespace}` not found in header")]
    NamespaceNotFound { namespace: String },

    /// The header's format/version token was not the expected one
    #[error("unsupported header `{found}`")]
    HeaderVersion { found: String },

    /// A member record references a class that never had a class record
    #[error("member references class `{owner}` with no class record")]
    UnresolvedOwner { owner: String },

    /// A produced key violated the mapping model's key rules
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl FormatError {
    /// Create a malformed line error
    pub fn malformed_line(line_no: usize, line: impl Into<String>) -> Self {
        Self::MalformedLine {
            line_no,
            line: line.into(),
        }
    }

    /// Create a namespace-not-found error
    pub fn namespace_not_found(namespace: impl Into<String>) -> Self {
        Self::NamespaceNotFound {
            namespace: namespace.into(),
        }
    }

    /// Create a header version error
    pub fn header_version(found: impl Into<String>) -> Self {
        Self::HeaderVersion {
            found: found.into(),
        }
    }

    /// Create an unresolved owner error
    pub fn unresolved_owner(owner: impl Into<String>) -> Self {
        Self::UnresolvedOwner {
            owner: owner.into(),
        }
    }
}
