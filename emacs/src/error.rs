use std::path::PathBuf;

/// Reason given by the host for refusing a document edit (read-only buffer, stale document, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EditRejected(pub String);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no active editor")]
    NoActiveEditor,

    #[error("host rejected edit: {0}")]
    HostEditFailed(#[from] EditRejected),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid key sequence: {0}")]
    InvalidKey(String),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
