//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored in PHC-like form:
//! `$argon2id$v=19$m=<kib>,t=<iterations>,p=<lanes>$<salt_b64>$<hash_b64>`.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::prelude::*;
use error::AppError;
use rand::{RngCore, rng};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,

    #[error("Base64 decoding failed: {0}")]
    DecodingFailed(#[from] base64::DecodeError),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::VerificationFailed => AppError::unauthorized("Invalid email or password"),
            other => AppError::internal(other.to_string()),
        }
    }
}

/// Configuration for Argon2id password hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 15 MiB = 15360 KiB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost:   u32,
    /// Number of lanes (default: 2)
    pub parallelism: u32,
    /// Length of the generated hash (default: 32 bytes)
    pub hash_length: u32,
    /// Length of the salt (default: 16 bytes)
    pub salt_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 15360,
            time_cost:   3,
            parallelism: 2,
            hash_length: 32,
            salt_length: 16,
        }
    }
}

impl PasswordConfig {
    /// The cheapest parameters Argon2 accepts. Only suitable for tests.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            memory_cost: Params::MIN_M_COST,
            time_cost: Params::MIN_T_COST,
            parallelism: 1,
            ..Self::default()
        }
    }
}

fn argon2(memory_cost: u32, time_cost: u32, parallelism: u32, output_len: usize) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(memory_cost, time_cost, parallelism, Some(output_len))
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash
/// * `config` - Optional configuration for Argon2id parameters
///
/// # Example
///
/// ```
/// use auth::password::{PasswordConfig, hash_password};
/// use secrecy::SecretString;
///
/// let password = SecretString::from("password123".to_string());
/// let hash = hash_password(&password, Some(PasswordConfig::minimal())).unwrap();
/// ```
pub fn hash_password(password: &SecretString, config: Option<PasswordConfig>) -> Result<SecretString, PasswordError> {
    let config = config.unwrap_or_default();

    let mut salt = vec![0u8; config.salt_length as usize];
    rng().fill_bytes(&mut salt);

    let mut output = vec![0u8; config.hash_length as usize];
    argon2(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        output.len(),
    )?
    .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut output)
    .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(SecretString::from(format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        BASE64_STANDARD.encode(&salt),
        BASE64_STANDARD.encode(&output)
    )))
}

/// Cost parameters recorded in a stored hash.
#[derive(Debug, PartialEq, Eq)]
struct HashParams {
    memory_cost: u32,
    time_cost:   u32,
    parallelism: u32,
}

fn parse_params(params: &str) -> Result<HashParams, PasswordError> {
    let mut memory_cost = None;
    let mut time_cost = None;
    let mut parallelism = None;

    for pair in params.split(',') {
        let (key, value) = pair.split_once('=').ok_or(PasswordError::InvalidHashFormat)?;
        let value: u32 = value.parse().map_err(|_| PasswordError::InvalidHashFormat)?;
        match key {
            "m" => memory_cost = Some(value),
            "t" => time_cost = Some(value),
            "p" => parallelism = Some(value),
            _ => return Err(PasswordError::InvalidHashFormat),
        }
    }

    match (memory_cost, time_cost, parallelism) {
        (Some(memory_cost), Some(time_cost), Some(parallelism)) => {
            Ok(HashParams {
                memory_cost,
                time_cost,
                parallelism,
            })
        },
        _ => Err(PasswordError::InvalidHashFormat),
    }
}

/// Verifies a password against a stored hash.
///
/// The comparison runs in constant time.
///
/// # Example
///
/// ```
/// use auth::password::{PasswordConfig, hash_password, verify_password};
/// use secrecy::{ExposeSecret, SecretString};
///
/// let password = SecretString::from("password123".to_string());
/// let hash = hash_password(&password, Some(PasswordConfig::minimal())).unwrap();
///
/// assert!(verify_password(&password, hash.expose_secret()).is_ok());
/// ```
pub fn verify_password(password: &SecretString, expected_hash: &str) -> Result<(), PasswordError> {
    // ["", "argon2id", "v=19", "m=..,t=..,p=..", "<salt>", "<hash>"]
    let parts: Vec<&str> = expected_hash.split('$').collect();
    let [empty, algorithm, version, params, salt_b64, hash_b64] = parts.as_slice()
    else {
        return Err(PasswordError::InvalidHashFormat);
    };

    if !empty.is_empty() || *algorithm != "argon2id" || *version != "v=19" {
        return Err(PasswordError::InvalidHashFormat);
    }

    let params = parse_params(params)?;
    let salt = BASE64_STANDARD.decode(salt_b64)?;
    let stored_hash = BASE64_STANDARD.decode(hash_b64)?;

    let mut computed_hash = vec![0u8; stored_hash.len()];
    argon2(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        stored_hash.len(),
    )?
    .hash_password_into(
        password.expose_secret().as_bytes(),
        &salt,
        &mut computed_hash,
    )
    .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    if computed_hash.as_slice().ct_eq(&stored_hash).into() {
        Ok(())
    }
    else {
        Err(PasswordError::VerificationFailed)
    }
}
