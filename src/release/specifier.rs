//! Version specifier classification

use std::fmt;

use super::ResolveError;

const TAG_PREFIX: &str = "tags/";

/// Which release a run should target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionSpecifier {
    /// Most recent published release
    #[default]
    Latest,
    /// Release by tag name (from `tags/<tag>`)
    Tag(String),
    /// Release by numeric id
    Id(u64),
}

impl VersionSpecifier {
    /// Classify a raw specifier.
    ///
    /// Order matters: `latest`, then `tags/<tag>` with a non-empty tag, then
    /// a base-10 number with any fractional part truncated. Anything else is
    /// rejected here, before a request is ever built.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        if raw == "latest" {
            return Ok(VersionSpecifier::Latest);
        }

        if let Some(tag) = raw.strip_prefix(TAG_PREFIX)
            && !tag.is_empty()
        {
            return Ok(VersionSpecifier::Tag(tag.to_string()));
        }

        parse_release_id(raw)
            .map(VersionSpecifier::Id)
            .ok_or_else(|| ResolveError::InvalidSpecifier(raw.to_string()))
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpecifier::Latest => f.write_str("latest"),
            VersionSpecifier::Tag(tag) => write!(f, "{TAG_PREFIX}{tag}"),
            VersionSpecifier::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Decimal release id, fractional part truncated (`"42.9"` -> 42)
fn parse_release_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Only plain decimal notation; f64 parsing alone would also take
    // "inf", "NaN" and exponents.
    let mut parts = trimmed.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let whole = whole.strip_prefix('+').unwrap_or(whole);
    let digits_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    if !digits_ok(whole) {
        return None;
    }
    match fraction {
        Some(f) if !digits_ok(f) => return None,
        Some(f) if whole.is_empty() && f.is_empty() => return None,
        None if whole.is_empty() => return None,
        _ => {}
    }

    if whole.is_empty() {
        return Some(0);
    }
    whole.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_is_exact() {
        assert_eq!(VersionSpecifier::parse("latest").unwrap(), VersionSpecifier::Latest);
        assert!(VersionSpecifier::parse("Latest").is_err());
        assert!(VersionSpecifier::parse(" latest").is_err());
    }

    #[test]
    fn tag_prefix_wins_over_numbers() {
        assert_eq!(
            VersionSpecifier::parse("tags/v2.0").unwrap(),
            VersionSpecifier::Tag("v2.0".into())
        );
        assert_eq!(
            VersionSpecifier::parse("tags/123").unwrap(),
            VersionSpecifier::Tag("123".into())
        );
        assert_eq!(
            VersionSpecifier::parse("tags/release/2024").unwrap(),
            VersionSpecifier::Tag("release/2024".into())
        );
    }

    #[test]
    fn empty_tag_falls_through_and_fails() {
        assert!(matches!(
            VersionSpecifier::parse("tags/"),
            Err(ResolveError::InvalidSpecifier(s)) if s == "tags/"
        ));
    }

    #[test]
    fn numeric_ids_truncate() {
        assert_eq!(VersionSpecifier::parse("1234").unwrap(), VersionSpecifier::Id(1234));
        assert_eq!(VersionSpecifier::parse("12.9").unwrap(), VersionSpecifier::Id(12));
        assert_eq!(VersionSpecifier::parse(" 7 ").unwrap(), VersionSpecifier::Id(7));
        assert_eq!(VersionSpecifier::parse(".5").unwrap(), VersionSpecifier::Id(0));
        assert_eq!(VersionSpecifier::parse("3.").unwrap(), VersionSpecifier::Id(3));
    }

    #[test]
    fn rejects_non_numeric() {
        for raw in ["", "v1.0", "abc", "-3", "1e3", "NaN", "inf", ".", "1.2.3", "0x10"] {
            assert!(
                VersionSpecifier::parse(raw).is_err(),
                "expected `{raw}` to be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips_the_shape() {
        assert_eq!(VersionSpecifier::Latest.to_string(), "latest");
        assert_eq!(VersionSpecifier::Tag("v1".into()).to_string(), "tags/v1");
        assert_eq!(VersionSpecifier::Id(9).to_string(), "9");
    }
}
