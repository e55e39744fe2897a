//! Input sanitization and validation utilities.

/// Maximum free-text length (descriptions, post bodies).
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum slug length.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Content types accepted for resume uploads.
const RESUME_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Content types accepted for company logo uploads.
const LOGO_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Sanitize a user-provided string for safe logging and storage.
///
/// Removes control characters (keeping newlines and tabs) and caps length.
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(MAX_TEXT_LENGTH)
        .collect()
}

/// Build a URL slug from a Portuguese title: accents folded, lowercased,
/// everything else collapsed to single hyphens.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = true; // suppress leading hyphen

    for c in input.chars() {
        let c = fold_accent(c).unwrap_or(c);
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(MAX_SLUG_LENGTH);
    slug
}

/// Fold the accented characters common in Portuguese text.
fn fold_accent(c: char) -> Option<char> {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => Some('a'),
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => Some('e'),
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => Some('i'),
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => Some('o'),
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => Some('u'),
        'ç' | 'Ç' => Some('c'),
        'ñ' | 'Ñ' => Some('n'),
        _ => None,
    }
}

/// Validate a stored slug (lowercase ascii, digits, single hyphens).
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn is_allowed_resume_type(content_type: &str) -> bool {
    RESUME_CONTENT_TYPES.contains(&content_type)
}

pub fn is_allowed_logo_type(content_type: &str) -> bool {
    LOGO_CONTENT_TYPES.contains(&content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_portuguese_accents() {
        assert_eq!(slugify("Eletricista em São João"), "eletricista-em-sao-joao");
        assert_eq!(slugify("Padaria & Confeitaria Três Irmãos"), "padaria-confeitaria-tres-irmaos");
    }

    #[test]
    fn slugify_collapses_and_trims_separators() {
        assert_eq!(slugify("  Vaga -- Urgente!  "), "vaga-urgente");
        assert_eq!(slugify("___"), "");
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("padaria-central"));
        assert!(is_valid_slug("vaga-2025"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("Maiuscula"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_string("ola\u{0000}mundo"), "olamundo");
        assert_eq!(sanitize_string("linha1\nlinha2"), "linha1\nlinha2");
    }

    #[test]
    fn upload_content_type_allowlists() {
        assert!(is_allowed_resume_type("application/pdf"));
        assert!(!is_allowed_resume_type("application/x-sh"));
        assert!(is_allowed_logo_type("image/png"));
        assert!(!is_allowed_logo_type("image/svg+xml"));
    }
}
