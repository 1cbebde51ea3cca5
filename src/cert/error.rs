// src/cert/error.rs
use crate::kube::StoreError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertError {
    /// A key destination could not be created or written.
    #[error("failed to write key material to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The crypto backend failed, e.g. the random source was unavailable.
    #[error("crypto failure while {context}: {source}")]
    Crypto {
        context: &'static str,
        #[source]
        source: openssl::error::ErrorStack,
    },

    #[error("failed to encode SSH public key: {0}")]
    KeyEncoding(#[source] ssh_key::Error),

    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CertError {
    pub(crate) fn empty(field: &'static str) -> Self {
        CertError::Validation {
            field,
            message: "must not be empty".to_string(),
        }
    }
}

impl From<CertError> for io::Error {
    fn from(error: CertError) -> Self {
        match error {
            CertError::Io { source, .. } => source,
            CertError::Validation { .. } => io::Error::new(io::ErrorKind::InvalidInput, error),
            CertError::Store(StoreError::NotFound { .. }) => {
                io::Error::new(io::ErrorKind::NotFound, error)
            }
            CertError::Store(StoreError::AlreadyExists { .. }) => {
                io::Error::new(io::ErrorKind::AlreadyExists, error)
            }
            _ => io::Error::new(io::ErrorKind::Other, error),
        }
    }
}

pub type Result<T> = std::result::Result<T, CertError>;
