//! Bearer tokens read from environment variables.
//!
//! Tokens are wrapped in [`SecretString`] as soon as they are read and only
//! exposed when building an `Authorization` header.

use secrecy::SecretString;

/// Read the token named by `var`. Missing, empty or non-Unicode values
/// count as "no token".
pub fn token_from_env(var: &str) -> Option<SecretString> {
    if var.is_empty() {
        return None;
    }
    match std::env::var(var) {
        Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val.trim().to_string())),
        Ok(_) | Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => {
            tracing::warn!(var, "token variable is not valid Unicode, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_token_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("LARDER_TEST_TOKEN_XYZ", " abc123 ");
        }
        let token = token_from_env("LARDER_TEST_TOKEN_XYZ").unwrap();
        assert_eq!(token.expose_secret(), "abc123");
        unsafe {
            std::env::remove_var("LARDER_TEST_TOKEN_XYZ");
        }
        assert!(token_from_env("LARDER_TEST_TOKEN_XYZ").is_none());
        assert!(token_from_env("").is_none());
    }
}
