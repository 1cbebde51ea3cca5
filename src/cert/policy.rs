// src/cert/policy.rs
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VersionMatch {
    Any,
    /// Case-sensitive substring of the version string, e.g. a build tag.
    Contains(String),
}

impl VersionMatch {
    pub fn matches(&self, version: &str) -> bool {
        match self {
            VersionMatch::Any => true,
            VersionMatch::Contains(marker) => version.contains(marker.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MountRule {
    pub framework: String,
    pub version: VersionMatch,
    pub mount: bool,
}

impl MountRule {
    pub fn new(framework: &str, version: VersionMatch, mount: bool) -> Self {
        Self {
            framework: framework.to_string(),
            version,
            mount,
        }
    }

    fn applies_to(&self, framework: &str, version: &str) -> bool {
        self.framework == framework && self.version.matches(version)
    }
}

/// Frameworks whose learners talk to each other over SSH.
pub fn default_rules() -> Vec<MountRule> {
    vec![
        MountRule::new(
            "tensorflow",
            VersionMatch::Contains("horovod".to_string()),
            true,
        ),
        MountRule::new("tensorflow", VersionMatch::Contains("ddl".to_string()), true),
        MountRule::new("mxnet", VersionMatch::Any, true),
    ]
}

/// Ordered rule table; the first matching rule decides, no match means `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPolicy {
    rules: Vec<MountRule>,
}

impl Default for MountPolicy {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl MountPolicy {
    pub fn from_rules(rules: Vec<MountRule>) -> Self {
        Self { rules }
    }

    pub fn with_rule(mut self, rule: MountRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn extend<I: IntoIterator<Item = MountRule>>(&mut self, rules: I) {
        self.rules.extend(rules);
    }

    pub fn rules(&self) -> &[MountRule] {
        &self.rules
    }

    pub fn needs_mounted_ssh_certs(&self, framework: &str, version: &str) -> bool {
        let mount = self
            .rules
            .iter()
            .find(|rule| rule.applies_to(framework, version))
            .map_or(false, |rule| rule.mount);
        debug!(framework, version, mount, "evaluated SSH mount policy");
        mount
    }
}

/// Decision against the built-in table.
pub fn needs_mounted_ssh_certs(framework: &str, version: &str) -> bool {
    MountPolicy::default().needs_mounted_ssh_certs(framework, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_mounted_ssh_certs() {
        assert!(needs_mounted_ssh_certs("tensorflow", "0.11-horovod"));
        assert!(needs_mounted_ssh_certs("tensorflow", "1.3-py2-ddl"));
        assert!(!needs_mounted_ssh_certs("tensorflow", "1.4-py3"));
        assert!(!needs_mounted_ssh_certs("caffe2", "0.8"));
        assert!(needs_mounted_ssh_certs("mxnet", "1.1.0"));
    }

    #[test]
    fn test_markers_are_substrings() {
        assert!(needs_mounted_ssh_certs("tensorflow", "0.11_horovod"));
        assert!(needs_mounted_ssh_certs("tensorflow", "1.3-py2-ddl-beta"));
        assert!(needs_mounted_ssh_certs("mxnet", ""));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!needs_mounted_ssh_certs("TensorFlow", "0.11-horovod"));
        assert!(!needs_mounted_ssh_certs("tensorflow", "0.11-HOROVOD"));
        assert!(!needs_mounted_ssh_certs("MXNet", "1.1.0"));
    }

    #[test]
    fn test_unknown_framework_defaults_to_false() {
        assert!(!needs_mounted_ssh_certs("", ""));
        assert!(!needs_mounted_ssh_certs("pytorch", "1.0-horovod"));
    }

    #[test]
    fn test_added_rule_extends_table() {
        let policy = MountPolicy::default().with_rule(MountRule::new(
            "pytorch",
            VersionMatch::Contains("mpi".to_string()),
            true,
        ));

        assert!(policy.needs_mounted_ssh_certs("pytorch", "1.0-mpi"));
        assert!(!policy.needs_mounted_ssh_certs("pytorch", "1.0"));
        assert!(policy.needs_mounted_ssh_certs("tensorflow", "0.11-horovod"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let policy = MountPolicy::from_rules(vec![
            MountRule::new("mxnet", VersionMatch::Contains("cpu".to_string()), false),
            MountRule::new("mxnet", VersionMatch::Any, true),
        ]);

        assert!(!policy.needs_mounted_ssh_certs("mxnet", "1.1.0-cpu"));
        assert!(policy.needs_mounted_ssh_certs("mxnet", "1.1.0"));
    }

    #[test]
    fn test_rule_json_form() {
        let rule: MountRule = serde_json::from_str(
            r#"{"framework":"pytorch","version":{"contains":"mpi"},"mount":true}"#,
        )
        .unwrap();
        assert_eq!(rule.version, VersionMatch::Contains("mpi".to_string()));

        let any: MountRule =
            serde_json::from_str(r#"{"framework":"mxnet","version":"any","mount":true}"#)
                .unwrap();
        assert_eq!(any.version, VersionMatch::Any);
    }
}
