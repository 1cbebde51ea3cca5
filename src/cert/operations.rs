// src/cert/operations.rs
use super::error::Result;
use super::policy::MountPolicy;
use super::secret::{SecretBuilder, SecretRecord};
use crate::kube::SecretStore;
use tracing::{info, warn};

/// Policy check, secret construction and storage for one job.
pub struct SshCertProvisioner<S: SecretStore> {
    policy: MountPolicy,
    builder: SecretBuilder,
    store: S,
}

impl<S: SecretStore> SshCertProvisioner<S> {
    pub fn new(policy: MountPolicy, builder: SecretBuilder, store: S) -> Self {
        Self {
            policy,
            builder,
            store,
        }
    }

    pub fn policy(&self) -> &MountPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns `None` when the framework needs no SSH certs.
    pub fn provision(
        &self,
        secret_name: &str,
        job_id: &str,
        framework: &str,
        version: &str,
    ) -> Result<Option<SecretRecord>> {
        if !self.policy.needs_mounted_ssh_certs(framework, version) {
            info!(job_id, framework, version, "no SSH certs needed");
            return Ok(None);
        }

        let record = self
            .builder
            .build_ssh_secret(secret_name, job_id, framework, version)?;
        let stored = self.store.store(record).map_err(|e| {
            warn!(namespace = self.store.namespace(), error = %e, "failed to store SSH secret");
            e
        })?;

        info!(
            namespace = self.store.namespace(),
            secret_name,
            job_id,
            "provisioned SSH certs"
        );
        Ok(Some(stored))
    }

    pub fn deprovision(&self, secret_name: &str) -> Result<()> {
        self.store.delete(secret_name)?;
        info!(
            namespace = self.store.namespace(),
            secret_name, "removed SSH certs"
        );
        Ok(())
    }
}
