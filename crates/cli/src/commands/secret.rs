//! Secret generation for `JWT_SECRET`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use thiserror::Error;

/// Default number of random bytes (encodes to 64 characters).
pub const DEFAULT_BYTES: usize = 48;

/// Fewest bytes that still encode to the 32 characters the server requires.
pub const MIN_BYTES: usize = 24;

/// Errors from [`generate`].
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret must be at least {MIN_BYTES} bytes (got {0})")]
    TooShort(usize),
}

/// Random bytes encoded as URL-safe base64 without padding.
pub fn generate(bytes: usize) -> Result<String, SecretError> {
    if bytes < MIN_BYTES {
        return Err(SecretError::TooShort(bytes));
    }

    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_length() {
        let secret = generate(DEFAULT_BYTES).unwrap();
        assert_eq!(secret.len(), 64);
        assert_eq!(URL_SAFE_NO_PAD.decode(&secret).unwrap().len(), DEFAULT_BYTES);
    }

    #[test]
    fn test_generate_minimum_meets_server_length() {
        assert!(generate(MIN_BYTES).unwrap().len() >= 32);
        assert!(matches!(generate(8), Err(SecretError::TooShort(8))));
    }

    #[test]
    fn test_secrets_differ() {
        assert_ne!(generate(DEFAULT_BYTES).unwrap(), generate(DEFAULT_BYTES).unwrap());
    }
}
