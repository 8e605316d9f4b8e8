//! Propagating member renames down an inheritance hierarchy.
//!
//! The class hierarchy itself is an external collaborator: the filler only
//! consumes an abstract lookup that turns a class key into the class's
//! members and its ordered superclass chain.

use crate::descriptor::class_references;
use crate::error::Result;
use crate::table::Mappings;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A field or method as seen by the hierarchy collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    /// Member name
    pub name: String,

    /// Type descriptor (field type, or method parameter/return types)
    pub descriptor: String,

    /// Private members never propagate to subclasses
    pub is_private: bool,
}

/// A resolved class: its own key plus its declared members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Class key (slash-delimited)
    pub name: String,

    /// Declared fields
    pub fields: Vec<MemberInfo>,

    /// Declared methods
    pub methods: Vec<MemberInfo>,
}

/// Result of resolving one class through the collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClass {
    /// The class itself
    pub class: ClassInfo,

    /// Superclasses, nearest first
    pub superclasses: Vec<ClassInfo>,
}

/// External class-hierarchy lookup consumed by [`fill`].
pub trait HierarchyResolver {
    /// Resolve a class key into its node and ordered superclass chain.
    ///
    /// `None` means the collaborator has no information for this class;
    /// the filler logs and moves on.
    fn resolve(&self, class_key: &str) -> Option<ResolvedClass>;
}

/// Add field/method mappings inherited from superclasses.
///
/// For every class mentioned anywhere in the mapping, each non-private,
/// non-constructor member of each superclass whose name maps to something
/// different *in the superclass's own context* is registered on the
/// subclass with skip-if-exists, so explicit entries are never overwritten.
/// A class the resolver cannot supply is skipped, not fatal.
pub fn fill<R: HierarchyResolver>(mappings: &mut Mappings, resolver: &R) -> Result<()> {
    for class_key in mentioned_classes(mappings) {
        let Some(resolved) = resolver.resolve(&class_key) else {
            log::warn!("no hierarchy information for `{class_key}`, skipping");
            continue;
        };
        fill_class(mappings, &class_key, &resolved)?;
    }
    Ok(())
}

/// Every class key the mapping mentions: class-table keys plus owners and
/// descriptor references embedded in field/method keys.
fn mentioned_classes(mappings: &Mappings) -> IndexSet<String> {
    let mut classes = IndexSet::new();
    for class in mappings.classes().keys() {
        classes.insert(class.clone());
    }
    for key in mappings.fields().keys() {
        classes.insert(key.owner.clone());
        if let Some(desc) = &key.descriptor {
            for reference in class_references(desc) {
                classes.insert(reference.to_string());
            }
        }
    }
    for key in mappings.methods().keys() {
        classes.insert(key.owner.clone());
        for reference in class_references(&key.descriptor) {
            classes.insert(reference.to_string());
        }
    }
    classes
}

fn is_initializer(name: &str) -> bool {
    name == "<init>" || name == "<clinit>"
}

fn fill_class(mappings: &mut Mappings, class_key: &str, resolved: &ResolvedClass) -> Result<()> {
    // targets already chosen for a (name, descriptor) pair during this
    // pass; a superclass further up proposing a different target is skipped
    let mut chosen_fields: HashMap<(String, String), String> = HashMap::new();
    let mut chosen_methods: HashMap<(String, String), String> = HashMap::new();

    for superclass in &resolved.superclasses {
        for field in &superclass.fields {
            if field.is_private {
                continue;
            }
            let mapped = mappings.map_field(&superclass.name, &field.name, Some(&field.descriptor));
            if mapped == field.name {
                continue;
            }
            let pair = (field.name.clone(), field.descriptor.clone());
            match chosen_fields.get(&pair) {
                Some(existing) if *existing != mapped => continue,
                Some(_) => {}
                None => {
                    chosen_fields.insert(pair, mapped.clone());
                }
            }
            mappings.add_field(class_key, &field.name, Some(&field.descriptor), &mapped, true)?;
        }

        for method in &superclass.methods {
            if method.is_private || is_initializer(&method.name) {
                continue;
            }
            let mapped = mappings.map_method(&superclass.name, &method.name, &method.descriptor);
            if mapped == method.name {
                continue;
            }
            let pair = (method.name.clone(), method.descriptor.clone());
            match chosen_methods.get(&pair) {
                Some(existing) if *existing != mapped => continue,
                Some(_) => {}
                None => {
                    chosen_methods.insert(pair, mapped.clone());
                }
            }
            mappings.add_method(class_key, &method.name, &method.descriptor, &mapped, true)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct MapResolver {
        classes: HashMap<String, ResolvedClass>,
    }

    impl MapResolver {
        fn new() -> Self {
            Self {
                classes: HashMap::new(),
            }
        }

        fn insert(&mut self, class: ResolvedClass) {
            self.classes.insert(class.class.name.clone(), class);
        }
    }

    impl HierarchyResolver for MapResolver {
        fn resolve(&self, class_key: &str) -> Option<ResolvedClass> {
            self.classes.get(class_key).cloned()
        }
    }

    fn method(name: &str, descriptor: &str, is_private: bool) -> MemberInfo {
        MemberInfo {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            is_private,
        }
    }

    fn class(name: &str) -> ClassInfo {
        ClassInfo {
            name: name.to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[test]
    fn propagates_inherited_method_renames() {
        let mut m = Mappings::new();
        m.add_class("a/Sub", "x/Sub", false).unwrap();
        m.add_method("a/Base", "run", "()V", "go", false).unwrap();

        let mut base = class("a/Base");
        base.methods.push(method("run", "()V", false));
        let mut resolver = MapResolver::new();
        resolver.insert(ResolvedClass {
            class: class("a/Sub"),
            superclasses: vec![base],
        });

        fill(&mut m, &resolver).unwrap();

        // calls through the subclass now resolve to the ancestor's rename
        assert_eq!(m.map_method("a/Sub", "run", "()V"), "go");
    }

    #[test]
    fn skips_private_members_and_initializers() {
        let mut m = Mappings::new();
        m.add_class("a/Sub", "x/Sub", false).unwrap();
        m.add_method("a/Base", "hidden", "()V", "renamed", false)
            .unwrap();
        m.add_method("a/Base", "<init>", "()V", "ctor", false)
            .unwrap();

        let mut base = class("a/Base");
        base.methods.push(method("hidden", "()V", true));
        base.methods.push(method("<init>", "()V", false));
        let mut resolver = MapResolver::new();
        resolver.insert(ResolvedClass {
            class: class("a/Sub"),
            superclasses: vec![base],
        });

        fill(&mut m, &resolver).unwrap();

        assert_eq!(m.map_method("a/Sub", "hidden", "()V"), "hidden");
        assert_eq!(m.map_method("a/Sub", "<init>", "()V"), "<init>");
    }

    #[test]
    fn explicit_subclass_mapping_wins() {
        let mut m = Mappings::new();
        m.add_method("a/Sub", "run", "()V", "explicit", false).unwrap();
        m.add_method("a/Base", "run", "()V", "inherited", false)
            .unwrap();

        let mut base = class("a/Base");
        base.methods.push(method("run", "()V", false));
        let mut resolver = MapResolver::new();
        resolver.insert(ResolvedClass {
            class: class("a/Sub"),
            superclasses: vec![base],
        });

        fill(&mut m, &resolver).unwrap();

        assert_eq!(m.map_method("a/Sub", "run", "()V"), "explicit");
    }

    #[test]
    fn conflicting_targets_keep_first_choice() {
        let mut m = Mappings::new();
        m.add_class("a/Sub", "x/Sub", false).unwrap();
        m.add_method("a/Near", "run", "()V", "first", false).unwrap();
        m.add_method("a/Far", "run", "()V", "second", false).unwrap();

        let mut near = class("a/Near");
        near.methods.push(method("run", "()V", false));
        let mut far = class("a/Far");
        far.methods.push(method("run", "()V", false));
        let mut resolver = MapResolver::new();
        resolver.insert(ResolvedClass {
            class: class("a/Sub"),
            superclasses: vec![near, far],
        });

        fill(&mut m, &resolver).unwrap();

        assert_eq!(m.map_method("a/Sub", "run", "()V"), "first");
    }

    #[test]
    fn unresolvable_class_does_not_abort_filling() {
        let mut m = Mappings::new();
        m.add_class("a/Unknown", "x/Unknown", false).unwrap();
        m.add_class("a/Sub", "x/Sub", false).unwrap();
        m.add_field("a/Base", "f", Some("I"), "g", false).unwrap();

        let mut base = class("a/Base");
        base.fields.push(MemberInfo {
            name: "f".to_string(),
            descriptor: "I".to_string(),
            is_private: false,
        });
        let mut resolver = MapResolver::new();
        // a/Unknown is deliberately absent from the resolver
        resolver.insert(ResolvedClass {
            class: class("a/Sub"),
            superclasses: vec![base],
        });

        fill(&mut m, &resolver).unwrap();

        assert_eq!(m.map_field("a/Sub", "f", Some("I")), "g");
    }

    #[test]
    fn mentions_owners_and_descriptor_references() {
        let mut m = Mappings::new();
        m.add_class("a/Mapped", "x/Mapped", false).unwrap();
        m.add_method("a/Owner", "run", "(La/Param;)V", "go", false)
            .unwrap();

        let mentioned = mentioned_classes(&m);
        assert!(mentioned.contains("a/Mapped"));
        assert!(mentioned.contains("a/Owner"));
        assert!(mentioned.contains("a/Param"));
    }
}
