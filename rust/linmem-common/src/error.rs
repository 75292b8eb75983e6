use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_request(requested: usize, max: usize) -> Error {
        Error(ErrorKind::InvalidRequest { requested, max }.into())
    }

    pub fn reserve_failed(len: usize, source: std::io::Error) -> Error {
        Error(
            ErrorKind::ResourceExhaustion {
                operation: MemoryOperation::Reserve,
                len,
                source,
            }
            .into(),
        )
    }

    pub fn commit_failed(len: usize, source: std::io::Error) -> Error {
        Error(
            ErrorKind::ResourceExhaustion {
                operation: MemoryOperation::Commit,
                len,
                source,
            }
            .into(),
        )
    }

    pub fn release_failed(len: usize, source: std::io::Error) -> Error {
        Error(ErrorKind::ReleaseFailure { len, source }.into())
    }

    pub fn poisoned() -> Error {
        Error(ErrorKind::Poisoned.into())
    }

    /// Returns `true` if the caller asked for more than the instance maximum.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidRequest { .. })
    }

    /// Returns `true` if the instance that produced this error can no longer
    /// be grown and should only be released.
    ///
    /// A failed reservation is not fatal: no instance exists yet, and the host
    /// may retry with a smaller maximum.
    pub fn is_fatal(&self) -> bool {
        match self.kind() {
            ErrorKind::InvalidArgument { .. } => false,
            ErrorKind::ResourceExhaustion { operation, .. } => {
                *operation == MemoryOperation::Commit
            }
            ErrorKind::InvalidRequest { .. }
            | ErrorKind::ReleaseFailure { .. }
            | ErrorKind::Poisoned => true,
        }
    }
}

/// The virtual memory operation that the OS refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryOperation {
    Reserve,
    Commit,
}

impl std::fmt::Display for MemoryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryOperation::Reserve => f.write_str("reserve"),
            MemoryOperation::Commit => f.write_str("commit"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid reallocation: requested {requested} bytes, maximum is {max}")]
    InvalidRequest { requested: usize, max: usize },

    #[error("failed to {operation} {len} bytes of memory: {source}")]
    ResourceExhaustion {
        operation: MemoryOperation,
        len: usize,
        source: std::io::Error,
    },

    #[error("failed to release {len} bytes of reserved memory: {source}")]
    ReleaseFailure { len: usize, source: std::io::Error },

    #[error("linear memory is unusable after a failed commit")]
    Poisoned,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        let oom = || std::io::Error::from(std::io::ErrorKind::OutOfMemory);
        assert!(!Error::reserve_failed(4096, oom()).is_fatal());
        assert!(Error::commit_failed(4096, oom()).is_fatal());
        assert!(Error::release_failed(4096, oom()).is_fatal());
        assert!(Error::invalid_request(21, 20).is_fatal());
        assert!(Error::poisoned().is_fatal());
        assert!(!Error::invalid_arg("max_len", "too small").is_fatal());
    }

    #[test]
    fn test_display() {
        let e = Error::invalid_request(21, 20);
        assert_eq!(
            e.to_string(),
            "invalid reallocation: requested 21 bytes, maximum is 20"
        );
        let e = Error::commit_failed(8192, std::io::Error::other("denied"));
        assert!(e.to_string().starts_with("failed to commit 8192 bytes"));
    }
}
