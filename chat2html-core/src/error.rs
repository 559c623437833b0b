use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("messages.json not found in {dir}")]
    MessagesFileNotFound { dir: PathBuf },

    #[error("invalid json in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed message id: {0:?}")]
    MalformedId(String),

    #[error("cannot read attachment {path}: {source}")]
    AttachmentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("attachment is not valid UTF-8: {path}")]
    NonUtf8Attachment { path: PathBuf },

    #[error("attachment name has no file component: {0:?}")]
    InvalidAttachmentName(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
