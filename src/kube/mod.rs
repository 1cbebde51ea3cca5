mod manifest;
mod store;

pub use manifest::SecretManifest;
pub use store::{InMemorySecretStore, SecretStore, StoreError};
