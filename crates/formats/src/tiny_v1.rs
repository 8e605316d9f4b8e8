//! Tiny v1 mapping file loader.
//!
//! ```text
//! v1\tofficial\tintermediary\tnamed
//! CLASS\ta\tnet/mod/Engine\tcom/example/Engine
//! FIELD\ta\tLa;\tb\tfield_1\tspeed
//! METHOD\ta\t(La;)V\tb\tmethod_1\trun
//! ```
//!
//! Every record carries one name column per header namespace. Field and
//! method records reference their owner (and write their descriptor) in the
//! *base* namespace — the first header column — so they are buffered until
//! all class records are known and resolved in a finalization pass through
//! an internal base→from helper table. That deferral also makes record
//! order irrelevant.

use crate::error::{FormatError, Result};
use remap_mappings::Mappings;

enum MemberKind {
    Field,
    Method,
}

struct PendingMember {
    kind: MemberKind,
    owner: String,
    descriptor: String,
    from_name: String,
    to_name: String,
}

/// Loader for Tiny v1 files, configured with the source and target
/// namespace names to extract.
#[derive(Debug, Clone)]
pub struct TinyV1Loader {
    from_ns: String,
    to_ns: String,
}

impl TinyV1Loader {
    /// Create a loader extracting `from_ns` → `to_ns` renames.
    pub fn new(from_ns: impl Into<String>, to_ns: impl Into<String>) -> Self {
        Self {
            from_ns: from_ns.into(),
            to_ns: to_ns.into(),
        }
    }

    /// Parse a complete mapping source, splitting it into lines.
    pub fn parse_str(&self, source: &str) -> Result<Mappings> {
        self.parse_lines(source.lines())
    }

    /// Parse an ordered sequence of already-decoded lines.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<Mappings>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter();
        let header = match lines.next() {
            Some(line) => line,
            None => return Err(FormatError::header_version("")),
        };
        let header = header.as_ref();
        let columns: Vec<&str> = header.split('\t').collect();
        if columns.first() != Some(&"v1") {
            return Err(FormatError::header_version(header));
        }
        let namespaces = &columns[1..];
        let from_idx = resolve_namespace(namespaces, &self.from_ns)?;
        let to_idx = resolve_namespace(namespaces, &self.to_ns)?;
        let ns_count = namespaces.len();

        // base → from translation table, filled by CLASS records
        let mut helper = Mappings::new();
        let mut output = Mappings::new();
        let mut pending: Vec<PendingMember> = Vec::new();

        for (idx, line) in lines.enumerate() {
            let line = line.as_ref();
            let line_no = idx + 2; // the header consumed line 1
            let columns: Vec<&str> = line.split('\t').collect();

            match columns.as_slice() {
                ["CLASS", names @ ..] if names.len() == ns_count => {
                    helper.add_class(names[0], names[from_idx], false)?;
                    output.add_class(names[from_idx], names[to_idx], false)?;
                }
                ["FIELD", owner, descriptor, names @ ..] if names.len() == ns_count => {
                    pending.push(PendingMember {
                        kind: MemberKind::Field,
                        owner: (*owner).to_string(),
                        descriptor: (*descriptor).to_string(),
                        from_name: names[from_idx].to_string(),
                        to_name: names[to_idx].to_string(),
                    });
                }
                ["METHOD", owner, descriptor, names @ ..] if names.len() == ns_count => {
                    pending.push(PendingMember {
                        kind: MemberKind::Method,
                        owner: (*owner).to_string(),
                        descriptor: (*descriptor).to_string(),
                        from_name: names[from_idx].to_string(),
                        to_name: names[to_idx].to_string(),
                    });
                }
                _ => return Err(FormatError::malformed_line(line_no, line)),
            }
        }

        for member in pending {
            if !helper.classes().contains_key(&member.owner) {
                return Err(FormatError::unresolved_owner(member.owner));
            }
            let owner = helper.map_class(&member.owner);
            let descriptor = helper.map_descriptor(&member.descriptor);
            match member.kind {
                MemberKind::Field => {
                    output.add_field(
                        &owner,
                        &member.from_name,
                        Some(&descriptor),
                        &member.to_name,
                        false,
                    )?;
                }
                MemberKind::Method => {
                    output.add_method(
                        &owner,
                        &member.from_name,
                        &descriptor,
                        &member.to_name,
                        false,
                    )?;
                }
            }
        }

        log::debug!(
            "parsed tiny v1 mapping ({} -> {}): {} classes, {} fields, {} methods",
            self.from_ns,
            self.to_ns,
            output.classes().len(),
            output.fields().len(),
            output.methods().len()
        );
        Ok(output)
    }
}

fn resolve_namespace(namespaces: &[&str], name: &str) -> Result<usize> {
    namespaces
        .iter()
        .position(|ns| *ns == name)
        .ok_or_else(|| FormatError::namespace_not_found(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "\
v1\tofficial\tintermediary\tnamed
CLASS\ta\tnet/mod/Engine\tcom/example/Engine
FIELD\ta\tLa;\tb\tfield_1\tspeed
METHOD\ta\t(La;I)V\tc\tmethod_1\trun
";

    #[test]
    fn extracts_configured_namespace_pair() {
        let mappings = TinyV1Loader::new("intermediary", "named")
            .parse_str(SOURCE)
            .unwrap();

        assert_eq!(
            mappings.map_class("net/mod/Engine"),
            "com/example/Engine"
        );
        // owners and descriptors are re-expressed in the from namespace
        assert_eq!(
            mappings.map_field("net/mod/Engine", "field_1", Some("Lnet/mod/Engine;")),
            "speed"
        );
        assert_eq!(
            mappings.map_method("net/mod/Engine", "method_1", "(Lnet/mod/Engine;I)V"),
            "run"
        );
    }

    #[test]
    fn base_namespace_as_source() {
        let mappings = TinyV1Loader::new("official", "intermediary")
            .parse_str(SOURCE)
            .unwrap();

        assert_eq!(mappings.map_class("a"), "net/mod/Engine");
        assert_eq!(mappings.map_field("a", "b", Some("La;")), "field_1");
    }

    #[test]
    fn member_records_may_precede_their_class_record() {
        let source = "\
v1\tofficial\tnamed
FIELD\ta\tI\tb\tspeed
CLASS\ta\tcom/example/Engine
";
        let mappings = TinyV1Loader::new("official", "named")
            .parse_str(source)
            .unwrap();
        assert_eq!(mappings.map_field("a", "b", Some("I")), "speed");
    }

    #[test]
    fn owner_without_class_record_fails_finalization() {
        let source = "\
v1\tofficial\tnamed
FIELD\tmissing\tI\tb\tspeed
";
        let err = TinyV1Loader::new("official", "named")
            .parse_str(source)
            .unwrap_err();
        match err {
            FormatError::UnresolvedOwner { owner } => assert_eq!(owner, "missing"),
            other => panic!("expected UnresolvedOwner, got {other}"),
        }
    }

    #[test]
    fn missing_namespace_is_reported() {
        let err = TinyV1Loader::new("official", "absent")
            .parse_str(SOURCE)
            .unwrap_err();
        assert!(matches!(err, FormatError::NamespaceNotFound { .. }));
    }

    #[test]
    fn wrong_header_token_is_reported() {
        let err = TinyV1Loader::new("official", "named")
            .parse_str("v2\tofficial\tnamed\n")
            .unwrap_err();
        assert!(matches!(err, FormatError::HeaderVersion { .. }));
    }

    #[test]
    fn unknown_record_tag_is_malformed() {
        let source = "v1\tofficial\tnamed\nWIDGET\ta\tb\n";
        let err = TinyV1Loader::new("official", "named")
            .parse_str(source)
            .unwrap_err();
        assert!(matches!(err, FormatError::MalformedLine { line_no: 2, .. }));
    }
}
