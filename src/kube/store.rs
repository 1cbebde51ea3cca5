// src/kube/store.rs
use crate::cert::SecretRecord;
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("secret {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },

    #[error("secret {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },
}

/// Where built secrets end up. Implementations are bound to one namespace.
pub trait SecretStore: Send + Sync {
    fn namespace(&self) -> &str;
    fn store(&self, record: SecretRecord) -> Result<SecretRecord, StoreError>;
    fn get(&self, name: &str) -> Result<SecretRecord, StoreError>;
    fn delete(&self, name: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    namespace: String,
    secrets: RwLock<HashMap<String, SecretRecord>>,
}

impl InMemorySecretStore {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            secrets: RwLock::new(HashMap::new()),
        }
    }

    pub fn find_by_training_id(&self, training_id: &str) -> Vec<SecretRecord> {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<_> = secrets
            .values()
            .filter(|s| s.training_id() == Some(training_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));
        found
    }

    pub fn len(&self) -> usize {
        self.secrets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn not_found(&self, name: &str) -> StoreError {
        StoreError::NotFound {
            namespace: self.namespace.clone(),
            name: name.to_string(),
        }
    }
}

impl SecretStore for InMemorySecretStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn store(&self, record: SecretRecord) -> Result<SecretRecord, StoreError> {
        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        if secrets.contains_key(record.name()) {
            return Err(StoreError::AlreadyExists {
                namespace: self.namespace.clone(),
                name: record.name().to_string(),
            });
        }
        debug!(namespace = %self.namespace, name = record.name(), "stored secret");
        secrets.insert(record.name().to_string(), record.clone());
        Ok(record)
    }

    fn get(&self, name: &str) -> Result<SecretRecord, StoreError> {
        self.secrets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| self.not_found(name))
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        match secrets.remove(name) {
            Some(_) => {
                debug!(namespace = %self.namespace, name, "deleted secret");
                Ok(())
            }
            None => Err(self.not_found(name)),
        }
    }
}
