use crate::error::{MappingError, Result};
use serde::{Deserialize, Serialize};

/// Sentinel key for the default (root) package
pub const DEFAULT_PACKAGE: &str = ".";

/// Key of a field mapping: owning class, field name, optional type descriptor.
///
/// The descriptor is optional because some source formats (TSRG) carry no
/// field types; lookups fall back from (name, descriptor) to (name) when the
/// descriptor-qualified key misses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey {
    /// Owning class key (slash-delimited)
    pub owner: String,

    /// Field name
    pub name: String,

    /// Type descriptor, when the source format supplied one
    pub descriptor: Option<String>,
}

impl FieldKey {
    /// Create a new field key
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: Option<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor,
        }
    }
}

/// Key of a method mapping: owning class, method name, descriptor.
///
/// The descriptor is never optional — overloaded methods sharing a name must
/// remain distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodKey {
    /// Owning class key (slash-delimited)
    pub owner: String,

    /// Method name
    pub name: String,

    /// Method descriptor (parameter and return types)
    pub descriptor: String,
}

impl MethodKey {
    /// Create a new method key
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// Normalize a package key to the trailing-separator convention.
///
/// The empty string and the `.` sentinel both denote the default package;
/// everything else is stored slash-delimited with a trailing `/`.
pub fn normalize_package(raw: &str) -> Result<String> {
    if raw.is_empty() || raw == DEFAULT_PACKAGE {
        return Ok(DEFAULT_PACKAGE.to_string());
    }
    if raw.contains('.') {
        return Err(MappingError::key_format(
            raw,
            "package keys are slash-delimited and must not contain `.`",
        ));
    }
    if raw.ends_with('/') {
        Ok(raw.to_string())
    } else {
        Ok(format!("{raw}/"))
    }
}

/// Validate a class, member, or descriptor key component.
pub(crate) fn ensure_no_dot(key: &str, what: &str) -> Result<()> {
    if key.contains('.') {
        return Err(MappingError::key_format(
            key,
            format!("{what} must not contain `.`"),
        ));
    }
    Ok(())
}

/// Convert a stored package key (`a/b/` or `.`) into dotted form (`a.b` or ``).
pub(crate) fn package_to_dotted(stored: &str) -> String {
    if stored == DEFAULT_PACKAGE {
        return String::new();
    }
    stored.trim_end_matches('/').replace('/', ".")
}

/// Convert a dotted package name (`a.b` or ``) back into stored form.
pub(crate) fn dotted_to_package(dotted: &str) -> String {
    if dotted.is_empty() {
        return DEFAULT_PACKAGE.to_string();
    }
    format!("{}/", dotted.replace('.', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_trailing_separator() {
        assert_eq!(normalize_package("a/b").unwrap(), "a/b/");
        assert_eq!(normalize_package("a/b/").unwrap(), "a/b/");
    }

    #[test]
    fn default_package_sentinel() {
        assert_eq!(normalize_package("").unwrap(), ".");
        assert_eq!(normalize_package(".").unwrap(), ".");
    }

    #[test]
    fn rejects_dotted_package() {
        let err = normalize_package("a.b").unwrap_err();
        assert!(matches!(err, MappingError::KeyFormat { .. }));
    }

    #[test]
    fn package_dotted_round_trip() {
        assert_eq!(package_to_dotted("a/b/"), "a.b");
        assert_eq!(package_to_dotted("."), "");
        assert_eq!(dotted_to_package("a.b"), "a/b/");
        assert_eq!(dotted_to_package(""), ".");
    }
}
