/// Which step of the program an error came from.
///
/// The kind decides the process exit code; the message carries the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing series identifier, credentials, or an invalid option.
    Config,
    /// Too few observations or a degenerate regression during analysis.
    Analysis,
    /// FRED request, status, or payload failure.
    Provider,
    /// `CREATE TABLE` conflict with an existing table.
    Schema,
    /// Connection, transaction, or insert failure.
    Store,
    /// Local file read/write failure (CSV/JSON import and export).
    Io,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Analysis => 3,
            ErrorKind::Provider => 4,
            ErrorKind::Schema => 5,
            ErrorKind::Store => 6,
            ErrorKind::Io => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Config => "config error",
            ErrorKind::Analysis => "analysis error",
            ErrorKind::Provider => "provider error",
            ErrorKind::Schema => "schema error",
            ErrorKind::Store => "store error",
            ErrorKind::Io => "io error",
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Analysis, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Provider, message)
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
