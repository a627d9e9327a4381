use std::fmt;

/// Errors that can arise when building, loading or searching a store.
#[derive(Debug)]
pub enum DictError {
    /// Underlying I/O error.
    Io(std::io::Error),
    /// The RDF input could not be parsed.
    Parse(String),
    /// Structural problem with inputs or unsupported operation.
    Invalid(&'static str),
    /// A positional seek went past the end of a match range.
    OutOfBounds { pos: u64, len: u64 },
    /// An identifier did not resolve against the dictionary.
    Corrupt(String),
}

impl fmt::Display for DictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictError::Io(e) => write!(f, "{}", e),
            DictError::Parse(m) => write!(f, "parse error: {}", m),
            DictError::Invalid(m) => write!(f, "{}", m),
            DictError::OutOfBounds { pos, len } => {
                write!(f, "position {} out of bounds for {} matches", pos, len)
            }
            DictError::Corrupt(m) => write!(f, "{}", m),
        }
    }
}

impl std::error::Error for DictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DictError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DictError {
    fn from(e: std::io::Error) -> Self {
        DictError::Io(e)
    }
}
