//! Project creation constants and validation.

use crate::error::CoreError;

/// Maximum length of a project name after trimming.
pub const MAX_NAME_LEN: usize = 255;

/// Language codes are BCP 47 tags such as `en`, `de-CH` or `zh-Hant-TW`.
pub const MIN_LANGUAGE_CODE_LEN: usize = 2;
pub const MAX_LANGUAGE_CODE_LEN: usize = 16;

/// Validate a project name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Project name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Project name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a language code: ASCII alphanumerics separated by `-`.
pub fn validate_language_code(field: &str, code: &str) -> Result<(), CoreError> {
    let len = code.len();
    let well_formed = (MIN_LANGUAGE_CODE_LEN..=MAX_LANGUAGE_CODE_LEN).contains(&len)
        && code
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));

    if well_formed {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} '{code}' is not a valid language code"
        )))
    }
}

/// Validate everything supplied when creating a project.
pub fn validate_new_project<'a>(
    name: &str,
    source_language: &str,
    target_language: &str,
    file_names: impl IntoIterator<Item = &'a str>,
) -> Result<(), CoreError> {
    validate_name(name)?;
    validate_language_code("source_language", source_language)?;
    validate_language_code("target_language", target_language)?;

    if source_language.eq_ignore_ascii_case(target_language) {
        return Err(CoreError::Validation(
            "Source and target language must differ".to_string(),
        ));
    }

    for (position, file_name) in file_names.into_iter().enumerate() {
        if file_name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "File at position {position} has an empty name"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_well_formed_project() {
        assert!(validate_new_project("Manual", "en", "de-CH", ["intro.docx"]).is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        assert_matches!(
            validate_new_project("   ", "en", "de", Vec::<&str>::new()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert_matches!(validate_name(&name), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_language_codes() {
        assert!(validate_language_code("source_language", "e").is_err());
        assert!(validate_language_code("source_language", "en--US").is_err());
        assert!(validate_language_code("source_language", "en_US").is_err());
        assert!(validate_language_code("source_language", "zh-Hant-TW").is_ok());
    }

    #[test]
    fn rejects_identical_languages() {
        assert_matches!(
            validate_new_project("Docs", "en", "EN", Vec::<&str>::new()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_unnamed_file() {
        let err = validate_new_project("Docs", "en", "fr", ["a.docx", " "]).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("File at position 1 has an empty name".to_string())
        );
    }
}
