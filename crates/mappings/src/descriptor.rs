//! Type descriptor remapping.
//!
//! Descriptors use the compact internal syntax: primitives (`B C D F I J S
//! Z V`), object types `L<class>;`, array dimensions as `[` prefixes, and
//! method shapes `(<params>)<ret>`. Remapping only touches the class
//! references; everything else passes through. Malformed input is passed
//! through unchanged past the point of the defect — descriptor mapping is a
//! total, best-effort operation like the table queries.

/// Rewrite every `L<class>;` reference in `desc` through `map_class`.
///
/// Works for field descriptors, method descriptors, and bare array types
/// alike; the surrounding structure is copied verbatim.
pub fn map_descriptor<F>(desc: &str, mut map_class: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(desc.len());
    let mut rest = desc;
    while let Some(start) = rest.find('L') {
        match rest[start + 1..].find(';') {
            Some(len) => {
                out.push_str(&rest[..start]);
                out.push('L');
                out.push_str(&map_class(&rest[start + 1..start + 1 + len]));
                out.push(';');
                rest = &rest[start + 1 + len + 1..];
            }
            None => break, // unterminated reference, keep the tail as-is
        }
    }
    out.push_str(rest);
    out
}

/// Enumerate the class names referenced by `desc`, in order of appearance.
pub fn class_references(desc: &str) -> Vec<&str> {
    let mut refs = Vec::new();
    let mut rest = desc;
    while let Some(start) = rest.find('L') {
        match rest[start + 1..].find(';') {
            Some(len) => {
                refs.push(&rest[start + 1..start + 1 + len]);
                rest = &rest[start + 1 + len + 1..];
            }
            None => break,
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rename(class: &str) -> String {
        match class {
            "a/Foo" => "x/Bar".to_string(),
            other => other.to_string(),
        }
    }

    #[test]
    fn primitives_untouched() {
        assert_eq!(map_descriptor("I", rename), "I");
        assert_eq!(map_descriptor("(IJ)V", rename), "(IJ)V");
    }

    #[test]
    fn object_reference_remapped() {
        assert_eq!(map_descriptor("La/Foo;", rename), "Lx/Bar;");
        assert_eq!(map_descriptor("La/Other;", rename), "La/Other;");
    }

    #[test]
    fn arrays_and_method_shapes() {
        assert_eq!(map_descriptor("[[La/Foo;", rename), "[[Lx/Bar;");
        assert_eq!(
            map_descriptor("(ILa/Foo;[J)La/Foo;", rename),
            "(ILx/Bar;[J)Lx/Bar;"
        );
    }

    #[test]
    fn unterminated_reference_passes_through() {
        assert_eq!(map_descriptor("(La/Foo", rename), "(La/Foo");
    }

    #[test]
    fn collects_class_references() {
        assert_eq!(
            class_references("(ILa/Foo;)Lb/Baz;"),
            vec!["a/Foo", "b/Baz"]
        );
        assert!(class_references("(IJ)V").is_empty());
    }
}
