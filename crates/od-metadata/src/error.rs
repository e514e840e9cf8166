//! Error types for od-metadata.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the metadata fetch never produced a response; the
    /// catalog is still unloaded and the next accessor call retries.
    pub fn is_connection_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Connection(_) | ErrorKind::Timeout)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The service answered the metadata request with an unexpected status.
    #[error("unexpected HTTP status {status} {reason}: {body}")]
    Response {
        status: u16,
        reason: String,
        body: String,
    },

    /// Transport failure during the metadata fetch.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timeout during the metadata fetch.
    #[error("request timeout")]
    Timeout,

    /// The metadata document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// Any other transport-layer error.
    #[error("client error: {0}")]
    Client(String),
}

impl From<odata1c_client::Error> for Error {
    fn from(err: odata1c_client::Error) -> Self {
        use odata1c_client::ErrorKind as ClientKind;

        let kind = match &err.kind {
            ClientKind::Response {
                status,
                reason,
                body,
            } => ErrorKind::Response {
                status: *status,
                reason: reason.clone(),
                body: body.clone(),
            },
            ClientKind::Timeout => ErrorKind::Timeout,
            ClientKind::Connection(message) => ErrorKind::Connection(message.clone()),
            _ => ErrorKind::Client(err.to_string()),
        };
        Error {
            kind,
            source: Some(Box::new(err)),
        }
    }
}
