//! Argon2id password checks for the login path.
//!
//! Hashing happens in the user repository when an account is created;
//! this module only verifies a candidate password against the stored
//! PHC string. The hash carries its own cost parameters, so
//! verification does not depend on the settings used to produce it.

use std::borrow::Cow;

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use crate::error::AuthError;

fn peppered<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, [u8]> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}").into_bytes()),
        None => Cow::Borrowed(password.as_bytes()),
    }
}

/// Check `password` against a stored Argon2id PHC hash.
///
/// The pepper must match the one applied at hashing time. A wrong
/// password is `Ok(false)`; a stored hash that fails to parse is
/// `Err(AuthError::Crypto)`.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("stored hash is not valid PHC: {e}")))?;

    match Argon2::default().verify_password(&peppered(password, pepper), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("argon2 verification failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;

    // Same cost parameters the user repository hashes with.
    fn repo_style_hash(password: &str, pepper: Option<&str>) -> String {
        let params = argon2::Params::new(19456, 2, 1, None).unwrap();
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        argon2
            .hash_password(&peppered(password, pepper), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn matching_password_verifies() {
        let hash = repo_style_hash("hunter2", None);
        assert!(verify_password("hunter2", &hash, None).unwrap());
        assert!(!verify_password("hunter3", &hash, None).unwrap());
    }

    #[test]
    fn pepper_must_match_both_sides() {
        let hash = repo_style_hash("hunter2", Some("orchard-secret"));
        assert!(verify_password("hunter2", &hash, Some("orchard-secret")).unwrap());
        assert!(!verify_password("hunter2", &hash, None).unwrap());
        assert!(!verify_password("hunter2", &hash, Some("other")).unwrap());
    }

    #[test]
    fn parameters_come_from_the_hash_itself() {
        // A hash produced with non-default costs still verifies,
        // because the PHC string embeds its parameters.
        let params = argon2::Params::new(8192, 1, 1, None).unwrap();
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(b"hunter2", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("hunter2", &hash, None).unwrap());
    }

    #[test]
    fn garbage_hash_is_a_crypto_error() {
        let err = verify_password("hunter2", "not-a-phc-string", None).unwrap_err();
        assert!(matches!(err, AuthError::Crypto(_)));
    }
}
