use ssh_cert_provisioner::{
    build_ssh_secret, cert::SSH_PRIVATE_KEY_FIELD, needs_mounted_ssh_certs, InMemorySecretStore,
    KeyPair, ProvisionerConfig, SecretBuilder, SecretStore, SshCertProvisioner,
};
use std::{sync::Arc, thread};

#[test]
fn fake_store_returns_secret_labelled_with_training_id() {
    let name = "secretName";
    let id = "trainingID";
    let secret = build_ssh_secret(name, id, "tensorflow", "0.11_horovod").unwrap();

    let config = ProvisionerConfig::default();
    let store = InMemorySecretStore::new(&config.learner_namespace);
    store.store(secret).unwrap();

    let received = store.get(name).unwrap();
    assert_eq!(received.labels()["training_id"], id);
}

#[test]
fn caller_checks_policy_before_building() {
    let store = InMemorySecretStore::new("learners");
    let jobs = [
        ("job-a", "tensorflow", "0.11-horovod"),
        ("job-b", "tensorflow", "1.4-py3"),
        ("job-c", "mxnet", "1.1.0"),
        ("job-d", "caffe2", "0.8"),
    ];

    for (job, framework, version) in jobs {
        if needs_mounted_ssh_certs(framework, version) {
            let secret = build_ssh_secret(&format!("{}-ssh", job), job, framework, version)
                .unwrap();
            store.store(secret).unwrap();
        }
    }

    assert_eq!(store.len(), 2);
    assert!(store.get("job-a-ssh").is_ok());
    assert!(store.get("job-b-ssh").is_err());
    assert!(store.get("job-c-ssh").is_ok());
}

#[test]
fn provisioner_uses_configured_rules_and_key_size() {
    let config: ProvisionerConfig = serde_json::from_str(
        r#"{
            "learner_namespace": "learners",
            "key_bits": 3072,
            "extra_mount_rules": [
                {"framework": "pytorch", "version": {"contains": "mpi"}, "mount": true}
            ]
        }"#,
    )
    .unwrap();
    config.validate().unwrap();

    let provisioner = SshCertProvisioner::new(
        config.mount_policy(),
        SecretBuilder::new(config.key_pair_generator().unwrap()),
        InMemorySecretStore::new(&config.learner_namespace),
    );

    let record = provisioner
        .provision("torch-ssh", "torch-job", "pytorch", "1.0-mpi")
        .unwrap()
        .expect("mpi builds need certs");
    let pair = KeyPair::from_private_pem(&record.data()[SSH_PRIVATE_KEY_FIELD]).unwrap();
    assert_eq!(Some(pair.public_encoding()), record.public_key());

    assert!(provisioner
        .provision("torch-plain-ssh", "torch-plain", "pytorch", "1.0")
        .unwrap()
        .is_none());
}

#[test]
fn concurrent_provisioning_yields_distinct_keys() {
    let provisioner = Arc::new(SshCertProvisioner::new(
        Default::default(),
        SecretBuilder::default(),
        InMemorySecretStore::new("learners"),
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let provisioner = Arc::clone(&provisioner);
            thread::spawn(move || {
                let job = format!("job-{}", i);
                provisioner
                    .provision(&format!("{}-ssh", job), &job, "mxnet", "1.1.0")
                    .unwrap()
                    .unwrap()
            })
        })
        .collect();

    let mut public_keys: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().public_key().unwrap().to_vec())
        .collect();
    public_keys.sort();
    public_keys.dedup();

    assert_eq!(public_keys.len(), 4);
    assert_eq!(provisioner.store().len(), 4);
}
