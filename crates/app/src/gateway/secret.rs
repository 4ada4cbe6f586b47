//! Processor API key handling.

use std::fmt;

use zeroize::Zeroize;

/// Secret API key for the payment processor.
///
/// Wiped from memory on drop and kept out of `Debug` output; the only way
/// to read it back is [`SecretKey::as_str`] at the request boundary.
#[derive(Clone)]
pub struct SecretKey {
    key: String,
}

impl SecretKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(**redacted**)")?;
        Ok(())
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
