// src/cert/secret.rs
use super::error::{CertError, Result};
use super::keypair::KeyPairGenerator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const SSH_PUBLIC_KEY_FIELD: &str = "ssh-publickey";
pub const SSH_PRIVATE_KEY_FIELD: &str = "ssh-privatekey";
pub const TRAINING_ID_LABEL: &str = "training_id";

/// Secret carrying one job's SSH key pair, ready to hand to a secret store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretRecord {
    name: String,
    owner_job_id: String,
    data: BTreeMap<String, Vec<u8>>,
    labels: BTreeMap<String, String>,
}

impl SecretRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_job_id(&self) -> &str {
        &self.owner_job_id
    }

    pub fn training_id(&self) -> Option<&str> {
        self.labels.get(TRAINING_ID_LABEL).map(String::as_str)
    }

    pub fn public_key(&self) -> Option<&[u8]> {
        self.data.get(SSH_PUBLIC_KEY_FIELD).map(Vec::as_slice)
    }

    pub fn private_key(&self) -> Option<&[u8]> {
        self.data.get(SSH_PRIVATE_KEY_FIELD).map(Vec::as_slice)
    }

    pub fn data(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.data
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }
}

#[derive(Debug, Clone, Default)]
pub struct SecretBuilder {
    generator: KeyPairGenerator,
}

impl SecretBuilder {
    pub fn new(generator: KeyPairGenerator) -> Self {
        Self { generator }
    }

    /// Generates an in-memory key pair and wraps it in a secret labelled with
    /// the job's training id. Does not consult the mount policy.
    pub fn build_ssh_secret(
        &self,
        secret_name: &str,
        job_id: &str,
        framework: &str,
        version: &str,
    ) -> Result<SecretRecord> {
        if secret_name.is_empty() {
            return Err(CertError::empty("secret name"));
        }
        if job_id.is_empty() {
            return Err(CertError::empty("training id"));
        }
        debug!(secret_name, job_id, framework, version, "building SSH secret");

        let pair = self.generator.generate(None, None)?;

        let data = BTreeMap::from([
            (
                SSH_PUBLIC_KEY_FIELD.to_string(),
                pair.public_encoding().to_vec(),
            ),
            (
                SSH_PRIVATE_KEY_FIELD.to_string(),
                pair.private_encoding().to_vec(),
            ),
        ]);
        let labels = BTreeMap::from([(TRAINING_ID_LABEL.to_string(), job_id.to_string())]);

        info!(
            secret_name,
            job_id,
            fingerprint = %pair.fingerprint(),
            "built SSH secret"
        );
        Ok(SecretRecord {
            name: secret_name.to_string(),
            owner_job_id: job_id.to_string(),
            data,
            labels,
        })
    }
}

/// Builds a secret with a default-sized key.
pub fn build_ssh_secret(
    secret_name: &str,
    job_id: &str,
    framework: &str,
    version: &str,
) -> Result<SecretRecord> {
    SecretBuilder::default().build_ssh_secret(secret_name, job_id, framework, version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::KeyPair;

    #[test]
    fn test_build_ssh_secret() {
        let secret = build_ssh_secret("secretName", "trainingID", "tensorflow", "0.11_horovod")
            .unwrap();

        assert_eq!(secret.name(), "secretName");
        assert_eq!(secret.owner_job_id(), "trainingID");
        assert_eq!(secret.training_id(), Some("trainingID"));
        assert_eq!(secret.labels().len(), 1);

        let keys: Vec<_> = secret.data().keys().map(String::as_str).collect();
        assert_eq!(keys, vec![SSH_PRIVATE_KEY_FIELD, SSH_PUBLIC_KEY_FIELD]);
    }

    #[test]
    fn test_secret_keys_belong_together() {
        let secret = build_ssh_secret("job-ssh", "job", "mxnet", "1.1.0").unwrap();

        let rebuilt = KeyPair::from_private_pem(secret.private_key().unwrap()).unwrap();
        assert_eq!(Some(rebuilt.public_encoding()), secret.public_key());
    }

    #[test]
    fn test_empty_identifiers_are_rejected() {
        let err = build_ssh_secret("", "trainingID", "tensorflow", "0.11_horovod").unwrap_err();
        assert!(matches!(
            err,
            CertError::Validation {
                field: "secret name",
                ..
            }
        ));

        let err = build_ssh_secret("secretName", "", "tensorflow", "0.11_horovod").unwrap_err();
        assert!(matches!(
            err,
            CertError::Validation {
                field: "training id",
                ..
            }
        ));
    }

    #[test]
    fn test_rebuilding_yields_new_key_material() {
        let first = build_ssh_secret("secretName", "trainingID", "mxnet", "1.1.0").unwrap();
        let second = build_ssh_secret("secretName", "trainingID", "mxnet", "1.1.0").unwrap();

        assert_eq!(first.name(), second.name());
        assert_eq!(first.labels(), second.labels());
        assert_ne!(first.public_key(), second.public_key());
        assert_ne!(first.private_key(), second.private_key());
    }

    #[test]
    fn test_builder_does_not_check_policy() {
        let secret = build_ssh_secret("caffe2-ssh", "job-7", "caffe2", "0.8").unwrap();
        assert!(secret.public_key().is_some());
    }
}
