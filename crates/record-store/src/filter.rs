//! The tiny filter grammar SCIM list endpoints accept (spec §4.1):
//! `attr eq "literal"`. Anything else is `BadFilter`.

use identity_core::error::{IdentityError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilter {
    pub attribute: String,
    pub literal: String,
}

/// Parses `attr eq "literal"`. The attribute name is a bare identifier
/// (letters, digits, `_`/`.`), the operator must be the literal word `eq`,
/// and the literal is a double-quoted string with no embedded escapes.
pub fn parse(filter: &str) -> Result<ParsedFilter> {
    let trimmed = filter.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let attribute = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().trim();

    if attribute.is_empty() || !attribute.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
        return Err(bad_filter(filter));
    }

    let rest = rest
        .strip_prefix("eq")
        .ok_or_else(|| bad_filter(filter))?
        .trim();

    if rest.len() < 2 || !rest.starts_with('"') || !rest.ends_with('"') {
        return Err(bad_filter(filter));
    }
    let literal = &rest[1..rest.len() - 1];
    if literal.contains('"') {
        return Err(bad_filter(filter));
    }

    Ok(ParsedFilter {
        attribute: attribute.to_string(),
        literal: literal.to_string(),
    })
}

fn bad_filter(filter: &str) -> IdentityError {
    IdentityError::BadFilter {
        filter: filter.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_filter() {
        let parsed = parse(r#"userName eq "jdoe""#).unwrap();
        assert_eq!(parsed.attribute, "userName");
        assert_eq!(parsed.literal, "jdoe");
    }

    #[test]
    fn rejects_unsupported_operators() {
        assert!(parse(r#"userName co "jdoe""#).is_err());
    }

    #[test]
    fn rejects_unquoted_literals() {
        assert!(parse("userName eq jdoe").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("not a filter at all").is_err());
        assert!(parse("").is_err());
    }
}
