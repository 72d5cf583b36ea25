//! Password-based authenticated encryption.
//!
//! Wraps Age passphrase encryption: scrypt with a fresh salt per message,
//! then ChaCha20-Poly1305 in STREAM mode with a MAC over the header. A wrong
//! password, a flipped byte or a truncated payload all fail decryption;
//! no partial plaintext is ever returned.
//!
//! ## Cost
//!
//! Age calibrates the scrypt work factor so that one key derivation takes
//! about a second on the encrypting machine, and every call here derives a
//! key. `encrypt` and `decrypt` therefore block for roughly that long, and so
//! does everything above them: `unlock`, `decrypt_body`, `encrypt_and_store`,
//! and a `flush` or suspend that writes a staged draft. Call them off any
//! latency-sensitive thread.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{CypherError, Result};

/// Encrypt `data` under `password`.
///
/// Ciphertext differs on every call even for identical input, because the
/// salt and payload nonce are drawn fresh each time.
///
/// # Examples
///
/// ```
/// use cypher_core::crypto::cipher::{decrypt, encrypt};
///
/// let encrypted = encrypt(b"buy milk", "hunter22").unwrap();
/// let decrypted = decrypt(&encrypted, "hunter22").unwrap();
/// assert_eq!(decrypted.as_slice(), b"buy milk");
/// ```
pub fn encrypt(data: &[u8], password: &str) -> Result<Vec<u8>> {
    let encryptor = age::Encryptor::with_user_passphrase(SecretString::from(password.to_string()));

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| CypherError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(data)
        .map_err(|e| CypherError::Crypto(format!("Encryption write failed: {}", e)))?;

    writer
        .finish()
        .map_err(|e| CypherError::Crypto(format!("Encryption finish failed: {}", e)))?;

    Ok(encrypted)
}

/// Decrypt `encrypted` with `password`.
///
/// # Errors
///
/// Returns `CypherError::AuthenticationFailure` for every failure: wrong
/// password, malformed header, bad MAC, truncated or corrupted payload.
pub fn decrypt(encrypted: &[u8], password: &str) -> Result<Zeroizing<Vec<u8>>> {
    let decryptor = age::Decryptor::new(encrypted).map_err(|e| {
        debug!(component = "cipher", op = "decrypt", error = %e, "rejected header");
        CypherError::AuthenticationFailure
    })?;

    let identity = age::scrypt::Identity::new(SecretString::from(password.to_string()));
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|e| {
            debug!(component = "cipher", op = "decrypt", error = %e, "key unwrap failed");
            CypherError::AuthenticationFailure
        })?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut decrypted).map_err(|e| {
        debug!(component = "cipher", op = "decrypt", error = %e, "payload rejected");
        CypherError::AuthenticationFailure
    })?;

    Ok(decrypted)
}
