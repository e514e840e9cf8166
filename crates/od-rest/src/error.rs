//! Error types for od-rest.

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
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The service answered with a status the operation did not expect.
    #[error("unexpected HTTP status {status} {reason}: {body}")]
    Response {
        status: u16,
        reason: String,
        body: String,
    },

    /// Transport failure before any response arrived.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// A record did not validate against the entity model.
    #[error("validation error: {0}")]
    Validation(String),

    /// The response JSON does not carry the expected list key.
    #[error("response JSON has no '{0}' key")]
    MissingListKey(String),

    /// An `expand()` field is not declared in the model's field aliases.
    #[error("unknown expand field '{0}'")]
    UnknownExpandField(String),

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
