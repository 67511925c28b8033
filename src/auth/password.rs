use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, warn};

/// bcrypt work factor for stored passwords.
pub const HASH_COST: u32 = 12;

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 72;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, HASH_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Returns `false` on mismatch and on hashes bcrypt cannot parse.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match bcrypt::verify(plain, hash) {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "bcrypt verify error");
            false
        }
    }
}

/// Hashes on the blocking pool so the cost factor does not stall other requests.
pub async fn hash_password_async(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task")?
}

pub async fn verify_password_async(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("password verification task")
}

/// First failing rule wins; `None` when the password is acceptable.
pub fn validate_password(password: &str) -> Option<&'static str> {
    lazy_static! {
        static ref LOWER: Regex = Regex::new(r"[a-z]").unwrap();
        static ref UPPER: Regex = Regex::new(r"[A-Z]").unwrap();
        static ref DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
        static ref SPECIAL: Regex = Regex::new(r"[!@#$%^&]").unwrap();
    }

    // Lengths are UTF-16 code units, so a surrogate pair counts twice.
    let len = password.encode_utf16().count();
    if len < MIN_LEN {
        return Some("Password must be longer than 8 characters");
    }
    if len > MAX_LEN {
        return Some("Password must be less than 72 characters");
    }
    if password.starts_with(' ') || password.ends_with(' ') {
        return Some("Password must not start or end with empty spaces");
    }
    let complex = [&*LOWER, &*UPPER, &*DIGIT, &*SPECIAL]
        .iter()
        .all(|re| re.is_match(password));
    if !complex {
        return Some(
            "Password must contain at least 1 upper case, 1 lower case, 1 number and 1 special character",
        );
    }
    None
}
