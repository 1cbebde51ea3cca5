// src/cert/mod.rs
mod error;
mod keypair;
pub mod operations;
mod policy;
mod secret;

pub use error::{CertError, Result};
pub use keypair::{
    generate_key_pair, KeyPair, KeyPairGenerator, DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS,
};
pub use operations::SshCertProvisioner;
pub use policy::{default_rules, needs_mounted_ssh_certs, MountPolicy, MountRule, VersionMatch};
pub use secret::{
    build_ssh_secret, SecretBuilder, SecretRecord, SSH_PRIVATE_KEY_FIELD, SSH_PUBLIC_KEY_FIELD,
    TRAINING_ID_LABEL,
};
