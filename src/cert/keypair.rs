// src/cert/keypair.rs
use super::error::{CertError, Result};
use openssl::{pkey::Private, rsa::Rsa};
use ssh_key::{
    public::{KeyData, RsaPublicKey},
    HashAlg, Mpint, PublicKey,
};
use std::{fmt, fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const DEFAULT_KEY_BITS: u32 = 2048;
pub const MIN_KEY_BITS: u32 = 2048;
pub const MAX_KEY_BITS: u32 = 8192;

/// One RSA key, held as its two encodings.
///
/// Both encodings are derived from the same key when the value is built and
/// can only be read afterwards, so the public line always matches the private
/// PEM.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    public: String,
    private: Vec<u8>,
    fingerprint: String,
}

impl KeyPair {
    fn from_rsa(rsa: &Rsa<Private>) -> Result<Self> {
        let private = rsa
            .private_key_to_pem()
            .map_err(|source| CertError::Crypto {
                context: "encoding the private key",
                source,
            })?;

        let key_data = KeyData::Rsa(RsaPublicKey {
            e: Mpint::from_positive_bytes(&rsa.e().to_vec())
                .map_err(|e| CertError::KeyEncoding(e.into()))?,
            n: Mpint::from_positive_bytes(&rsa.n().to_vec())
                .map_err(|e| CertError::KeyEncoding(e.into()))?,
        });
        let public_key = PublicKey::new(key_data, "");
        let mut public = public_key.to_openssh().map_err(CertError::KeyEncoding)?;
        public.push('\n');

        Ok(Self {
            public,
            private,
            fingerprint: public_key.fingerprint(HashAlg::Sha256).to_string(),
        })
    }

    /// Rebuilds a pair from an existing PEM private key.
    pub fn from_private_pem(pem: &[u8]) -> Result<Self> {
        let rsa = Rsa::private_key_from_pem(pem).map_err(|source| CertError::Crypto {
            context: "parsing the private key",
            source,
        })?;
        Self::from_rsa(&rsa)
    }

    /// Single `ssh-rsa AAAA...` line, newline terminated.
    pub fn public_encoding(&self) -> &[u8] {
        self.public.as_bytes()
    }

    pub fn public_key_line(&self) -> &str {
        &self.public
    }

    /// PKCS#1 PEM block.
    pub fn private_encoding(&self) -> &[u8] {
        &self.private
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public.trim_end())
            .field("private", &"<redacted>")
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPairGenerator {
    bits: u32,
}

impl Default for KeyPairGenerator {
    fn default() -> Self {
        Self {
            bits: DEFAULT_KEY_BITS,
        }
    }
}

impl KeyPairGenerator {
    pub fn with_bits(bits: u32) -> Result<Self> {
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
            return Err(CertError::Validation {
                field: "key size",
                message: format!(
                    "{} bits is outside the supported range {}..={}",
                    bits, MIN_KEY_BITS, MAX_KEY_BITS
                ),
            });
        }
        Ok(Self { bits })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Generates a fresh key and writes each encoding to its destination.
    ///
    /// A destination that is `None` or an empty path is skipped. Parent
    /// directories must already exist. Both files are staged before either
    /// destination is replaced, so a failed call leaves existing keys intact.
    pub fn generate(&self, public: Option<&Path>, private: Option<&Path>) -> Result<KeyPair> {
        let rsa = Rsa::generate(self.bits).map_err(|source| CertError::Crypto {
            context: "generating an RSA key",
            source,
        })?;
        let pair = KeyPair::from_rsa(&rsa)?;

        let staged_private = destination(private)
            .map(|path| {
                debug!(path = %path.display(), "staging private key");
                StagedKey::write(path, pair.private_encoding(), 0o600)
            })
            .transpose()?;
        let staged_public = destination(public)
            .map(|path| {
                debug!(path = %path.display(), "staging public key");
                StagedKey::write(path, pair.public_encoding(), 0o644)
            })
            .transpose()?;

        if let Some(staged) = staged_public {
            staged.commit()?;
        }
        if let Some(staged) = staged_private {
            staged.commit()?;
        }

        info!(
            bits = self.bits,
            fingerprint = %pair.fingerprint(),
            "generated SSH key pair"
        );
        Ok(pair)
    }
}

/// Generates a key pair of the default size.
pub fn generate_key_pair(public: Option<&Path>, private: Option<&Path>) -> Result<KeyPair> {
    KeyPairGenerator::default().generate(public, private)
}

fn destination(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Key bytes in a temp file next to their destination. Dropping it without
/// `commit` removes the temp file.
struct StagedKey<'a> {
    path: &'a Path,
    file: NamedTempFile,
}

impl<'a> StagedKey<'a> {
    fn write(path: &'a Path, contents: &[u8], mode: u32) -> Result<Self> {
        let io_err = |source| CertError::Io {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Created 0600; the final mode is applied before any key bytes are written.
        let mut file = tempfile::Builder::new()
            .prefix(".ssh-key-")
            .tempfile_in(dir)
            .map_err(|e| {
                warn!(path = %path.display(), error = %e, "failed to create key file");
                io_err(e)
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(mode))
                .map_err(io_err)?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        file.write_all(contents)
            .and_then(|_| file.as_file().sync_all())
            .map_err(io_err)?;

        Ok(Self { path, file })
    }

    fn commit(self) -> Result<()> {
        let path = self.path;
        self.file.persist(path).map_err(|e| {
            warn!(path = %path.display(), error = %e.error, "failed to move key file into place");
            CertError::Io {
                path: path.to_path_buf(),
                source: e.error,
            }
        })?;
        Ok(())
    }
}
