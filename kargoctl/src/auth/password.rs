//! Password hashing with argon2id.
//!
//! Hashing and verification take tens of milliseconds on purpose; callers
//! in async context must wrap these in `tokio::task::spawn_blocking`.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::{Error, Result};

/// OWASP-recommended argon2id parameters (19 MiB, 2 iterations).
struct Argon2Params;

impl Argon2Params {
    const MEMORY_KIB: u32 = 19456;
    const ITERATIONS: u32 = 2;
    const PARALLELISM: u32 = 1;
}

fn argon2() -> Result<Argon2<'static>> {
    let params = argon2::Params::new(
        Argon2Params::MEMORY_KIB,
        Argon2Params::ITERATIONS,
        Argon2Params::PARALLELISM,
        None,
    )
    .map_err(|_| Error::Internal {
        operation: "constructing argon2 parameters".to_string(),
    })?;

    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

pub fn hash_string(value: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?
        .hash_password(value.as_bytes(), &salt)
        .map_err(|_| Error::Internal {
            operation: "hashing password".to_string(),
        })?;
    Ok(hash.to_string())
}

/// Returns `Ok(true)` when the value matches the hash. A malformed hash is
/// a server-side problem, not a wrong password.
pub fn verify_string(value: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|_| Error::Internal {
        operation: "parsing stored password hash".to_string(),
    })?;

    Ok(argon2()?
        .verify_password(value.as_bytes(), &parsed)
        .is_ok())
}
