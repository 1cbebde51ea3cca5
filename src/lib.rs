//! SSH credential provisioning for distributed training jobs.
//!
//! [`cert::needs_mounted_ssh_certs`] decides whether a framework version needs
//! passwordless SSH between learners, [`cert::build_ssh_secret`] turns a fresh
//! RSA key pair into a secret labelled with the job's training id, and
//! [`kube::SecretStore`] is the seam to whatever persists it.

pub mod cert;
pub mod config;
pub mod kube;
pub mod utils;

pub use cert::{
    build_ssh_secret, generate_key_pair, needs_mounted_ssh_certs, CertError, KeyPair,
    KeyPairGenerator, MountPolicy, SecretBuilder, SecretRecord, SshCertProvisioner,
};
pub use config::ProvisionerConfig;
pub use kube::{InMemorySecretStore, SecretStore, StoreError};
