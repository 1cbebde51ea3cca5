// config/types.rs
use crate::cert::{CertError, KeyPairGenerator, MountPolicy, MountRule, DEFAULT_KEY_BITS};
use serde::{Deserialize, Serialize};
use std::{fs, io};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProvisionerConfig {
    pub learner_namespace: String,
    pub key_bits: u32,
    pub log_file: Option<String>,
    pub debug: bool,
    /// Appended after the built-in rules.
    pub extra_mount_rules: Vec<MountRule>,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            learner_namespace: "default".to_string(),
            key_bits: DEFAULT_KEY_BITS,
            log_file: None,
            debug: false,
            extra_mount_rules: Vec::new(),
        }
    }
}

impl ProvisionerConfig {
    pub fn load_from_file(path: &str) -> io::Result<Self> {
        let config_str = fs::read_to_string(shellexpand::tilde(path).as_ref())?;
        serde_json::from_str(&config_str).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let config_str = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(shellexpand::tilde(path).as_ref(), config_str)
    }

    pub fn validate(&self) -> io::Result<()> {
        if self.learner_namespace.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "learner_namespace must not be empty",
            ));
        }
        if let Some(rule) = self.extra_mount_rules.iter().find(|r| r.framework.is_empty()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("mount rule without framework: {:?}", rule),
            ));
        }
        self.key_pair_generator()?;
        Ok(())
    }

    pub fn mount_policy(&self) -> MountPolicy {
        let mut policy = MountPolicy::default();
        policy.extend(self.extra_mount_rules.iter().cloned());
        policy
    }

    pub fn key_pair_generator(&self) -> Result<KeyPairGenerator, CertError> {
        KeyPairGenerator::with_bits(self.key_bits)
    }
}
