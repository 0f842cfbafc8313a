use thiserror::Error;

pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// bcrypt work factor from `BCRYPT_COST`, clamped to the valid range
pub fn cost_from_env() -> u32 {
    std::env::var("BCRYPT_COST")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .map(|v| v.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST))
        .unwrap_or(bcrypt::DEFAULT_COST)
}

/// Hash off the async runtime, bcrypt is deliberately slow
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// False for a wrong password and for a hash that is not bcrypt
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || {
        match bcrypt::verify(password, &hash) {
            Ok(ok) => Ok(ok),
            Err(bcrypt::BcryptError::InvalidHash(_))
            | Err(bcrypt::BcryptError::InvalidPrefix(_))
            | Err(bcrypt::BcryptError::InvalidCost(_))
            | Err(bcrypt::BcryptError::InvalidBase64(_)) => Ok(false),
            Err(err) => Err(err),
        }
    })
    .await??;
    Ok(verified)
}

/// Usernames are email addresses: `local@domain.tld`, no spaces
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("parent@example.com"));
        assert!(is_valid_email("a.b+kid@mail.school.org"));
        assert!(!is_valid_email("parent"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("parent@example"));
        assert!(!is_valid_email("parent@exa mple.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("parent@.com"));
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("secret", MIN_BCRYPT_COST).await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("secret", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_non_bcrypt_hash_never_matches() {
        assert!(!verify_password("123", "123").await.unwrap());
        assert!(!verify_password("admin", "").await.unwrap());
    }
}
