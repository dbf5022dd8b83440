// src/secret.rs

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Smallest secret the generator will produce, in bytes.
pub const MIN_SECRET_BYTES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretFormat {
    #[default]
    Hex,
    /// URL-safe alphabet, no padding.
    Base64,
}

impl FromStr for SecretFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(SecretFormat::Hex),
            "base64" => Ok(SecretFormat::Base64),
            other => Err(format!("unknown format '{}' (expected 'hex' or 'base64')", other)),
        }
    }
}

impl fmt::Display for SecretFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretFormat::Hex => f.write_str("hex"),
            SecretFormat::Base64 => f.write_str("base64"),
        }
    }
}

/// Draws `bytes` random bytes from the OS and encodes them.
///
/// `bytes` is raised to [`MIN_SECRET_BYTES`] if smaller.
pub fn generate_secret(bytes: usize, format: SecretFormat) -> String {
    let mut buf = vec![0u8; bytes.max(MIN_SECRET_BYTES)];
    OsRng.fill_bytes(&mut buf);
    match format {
        SecretFormat::Hex => hex::encode(&buf),
        SecretFormat::Base64 => URL_SAFE_NO_PAD.encode(&buf),
    }
}
