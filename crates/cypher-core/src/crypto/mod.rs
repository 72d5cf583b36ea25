//! Cryptographic operations for the note store.
//!
//! - **cipher**: password-based authenticated encryption via Age
//!   (scrypt + ChaCha20-Poly1305)
//! - **validator**: canary-based password checking
//! - **password**: caller-side password policy
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the note database or settings file
//! - Silent corruption or tampering of stored ciphertext
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / process memory

pub mod cipher;
pub mod password;
pub mod validator;

pub use cipher::{decrypt, encrypt};
pub use password::PasswordPolicy;
pub use validator::{PasswordValidator, Validation};
