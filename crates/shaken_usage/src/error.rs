#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    InvalidCharacters { pattern: String, position: usize },
    DuplicateKey(String),
    InvalidId(String),
    MissingCapability(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCharacters { pattern, position } => write!(
                f,
                "invalid character at position {} in usage: '{}'",
                position, pattern
            ),
            Self::DuplicateKey(key) => write!(f, "duplicate key found: {}", key),
            Self::InvalidId(id) => write!(f, "not a valid id: {}", id),
            Self::MissingCapability(what) => write!(f, "cannot fetch {}", what),
        }
    }
}

impl std::error::Error for Error {}
