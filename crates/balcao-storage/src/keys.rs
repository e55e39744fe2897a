//! Namespaced object key construction and validation.
//!
//! Keys are always built server-side from a validated file name; clients
//! never choose their own keys.

use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

const MAX_KEY_LENGTH: usize = 512;
const MAX_FILE_NAME_LENGTH: usize = 128;

/// Key for an uploaded resume: `curriculos/{uuid}/{file_name}`.
pub fn resume_key(file_name: &str) -> StorageResult<String> {
    let name = validate_file_name(file_name)?;
    Ok(format!("curriculos/{}/{}", Uuid::new_v4(), name))
}

/// Key for a company logo: `logos/{company_id}/{file_name}`.
pub fn logo_key(company_id: Uuid, file_name: &str) -> StorageResult<String> {
    let name = validate_file_name(file_name)?;
    Ok(format!("logos/{company_id}/{name}"))
}

/// Validate a stored key before signing or deleting against it.
///
/// Only keys under the known namespaces are accepted.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::invalid_key("key length out of bounds"));
    }
    if key.contains("..") || key.starts_with('/') {
        return Err(StorageError::invalid_key("key must not traverse paths"));
    }
    if !(key.starts_with("curriculos/") || key.starts_with("logos/")) {
        return Err(StorageError::invalid_key(format!(
            "key outside known namespaces: {key}"
        )));
    }
    Ok(())
}

fn validate_file_name(name: &str) -> StorageResult<&str> {
    if name.is_empty() || name.len() > MAX_FILE_NAME_LENGTH {
        return Err(StorageError::invalid_key("file name length out of bounds"));
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(StorageError::invalid_key("file name must not traverse paths"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(StorageError::invalid_key(format!(
            "file name has forbidden characters: {name}"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_keys_are_namespaced_and_unique() {
        let a = resume_key("cv.pdf").unwrap();
        let b = resume_key("cv.pdf").unwrap();
        assert!(a.starts_with("curriculos/"));
        assert!(a.ends_with("/cv.pdf"));
        assert_ne!(a, b);
    }

    #[test]
    fn logo_key_embeds_company_id() {
        let id = Uuid::new_v4();
        let key = logo_key(id, "logo.png").unwrap();
        assert_eq!(key, format!("logos/{id}/logo.png"));
    }

    #[test]
    fn traversal_and_bad_chars_rejected() {
        assert!(resume_key("../etc/passwd").is_err());
        assert!(resume_key("a/b.pdf").is_err());
        assert!(resume_key("curri culo.pdf").is_err());
        assert!(resume_key("").is_err());
    }

    #[test]
    fn validate_key_accepts_known_namespaces_only() {
        assert!(validate_key("curriculos/x/cv.pdf").is_ok());
        assert!(validate_key("logos/y/logo.png").is_ok());
        assert!(validate_key("outros/z").is_err());
        assert!(validate_key("curriculos/../secret").is_err());
        assert!(validate_key("/curriculos/x").is_err());
    }
}
