// src/kube/manifest.rs
use crate::cert::SecretRecord;
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use std::{collections::BTreeMap, io};

/// `v1/Secret` object as the orchestrator API accepts it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretManifest {
    api_version: String,
    kind: String,
    metadata: Metadata,
    #[serde(rename = "type")]
    secret_type: String,
    data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct Metadata {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    labels: BTreeMap<String, String>,
}

impl SecretManifest {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }

    /// Base64 encoded values, keyed like the record's data.
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn to_yaml(&self) -> io::Result<String> {
        serde_yaml::to_string(self).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    pub fn to_json(&self) -> io::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl SecretRecord {
    pub fn to_manifest(&self, namespace: Option<&str>) -> SecretManifest {
        SecretManifest {
            api_version: "v1".to_string(),
            kind: "Secret".to_string(),
            metadata: Metadata {
                name: self.name().to_string(),
                namespace: namespace.map(str::to_string),
                labels: self.labels().clone(),
            },
            secret_type: "Opaque".to_string(),
            data: self
                .data()
                .iter()
                .map(|(k, v)| (k.clone(), general_purpose::STANDARD.encode(v)))
                .collect(),
        }
    }
}
