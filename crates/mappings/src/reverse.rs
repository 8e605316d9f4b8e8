//! Reverse table derivation.
//!
//! Recomputes a reverse instance's tables from a forward table's current
//! state, top-down: packages, then classes, then fields and methods. The
//! derivation is never incremental — each invalidated level is rebuilt from
//! scratch, never patched in place.

use crate::table::Mappings;
use crate::types::{FieldKey, MethodKey};

/// Rebuild every reverse level.
pub(crate) fn rebuild_all(forward: &Mappings, rev: &mut Mappings) {
    rebuild_packages(forward, rev);
    rebuild_from_classes(forward, rev);
}

/// Rebuild the class level and the member levels that depend on it.
///
/// Field and method reverse keys embed the owner class name, which changes
/// meaning whenever the forward class table does.
pub(crate) fn rebuild_from_classes(forward: &Mappings, rev: &mut Mappings) {
    rebuild_classes(forward, rev);
    rebuild_fields(forward, rev);
    rebuild_methods(forward, rev);
}

fn rebuild_packages(forward: &Mappings, rev: &mut Mappings) {
    rev.packages.clear();
    for (from, to) in &forward.packages {
        rev.packages.insert(to.clone(), from.clone());
    }
}

fn rebuild_classes(forward: &Mappings, rev: &mut Mappings) {
    rev.classes.clear();
    for from in forward.classes.keys() {
        // the reverse key is the fully mapped name, so package mapping is
        // composed in
        rev.classes.insert(forward.map_class(from), from.clone());
    }
}

pub(crate) fn rebuild_fields(forward: &Mappings, rev: &mut Mappings) {
    rev.fields.clear();
    for (key, new_name) in &forward.fields {
        let reversed = FieldKey::new(
            forward.map_class(&key.owner),
            new_name.clone(),
            key.descriptor.as_deref().map(|d| forward.map_descriptor(d)),
        );
        rev.fields.insert(reversed, key.name.clone());
    }
}

pub(crate) fn rebuild_methods(forward: &Mappings, rev: &mut Mappings) {
    rev.methods.clear();
    for (key, new_name) in &forward.methods {
        let reversed = MethodKey::new(
            forward.map_class(&key.owner),
            new_name.clone(),
            forward.map_descriptor(&key.descriptor),
        );
        rev.methods.insert(reversed, key.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reverse_class_key_uses_mapped_name() {
        let mut forward = Mappings::new();
        forward.add_package("a/", "b/", false).unwrap();
        forward.add_class("a/Foo", "a/Bar", false).unwrap();

        let mut rev = Mappings::new();
        rebuild_all(&forward, &mut rev);

        // key is "b/Bar" (class rename plus package mapping), not "a/Bar"
        assert_eq!(rev.classes().get("b/Bar"), Some(&"a/Foo".to_string()));
        assert!(!rev.classes().contains_key("a/Bar"));
    }

    #[test]
    fn reverse_members_rekey_owner_and_descriptor() {
        let mut forward = Mappings::new();
        forward.add_class("a/Foo", "a/Bar", false).unwrap();
        forward
            .add_method("a/Foo", "run", "(La/Foo;)La/Foo;", "go", false)
            .unwrap();

        let mut rev = Mappings::new();
        rebuild_all(&forward, &mut rev);

        let key = MethodKey::new("a/Bar", "go", "(La/Bar;)La/Bar;");
        assert_eq!(rev.methods().get(&key), Some(&"run".to_string()));
    }

    #[test]
    fn rebuild_clears_previous_state() {
        let mut forward = Mappings::new();
        forward.add_class("a/Foo", "a/Bar", false).unwrap();

        let mut rev = Mappings::new();
        rev.add_class("stale/Key", "stale/Value", false).unwrap();
        rebuild_from_classes(&forward, &mut rev);

        assert!(!rev.classes().contains_key("stale/Key"));
        assert_eq!(rev.classes().len(), 1);
    }
}
