//! Bridging two mapping tables through their shared intermediary namespace.

use crate::table::Mappings;
use crate::types::{dotted_to_package, package_to_dotted};

/// Compose `from` (namespace1 → namespace2) with `to` (namespace2 →
/// namespace3) into a direct namespace1 → namespace3 table.
///
/// Every entry of `from` is re-resolved through `to`: package and class
/// values directly, field and method entries via their intermediary owner
/// and intermediary descriptor. Keys stay in `from`'s source namespace, so
/// a consumer never needs the intermediary names at runtime.
#[must_use]
pub fn bridge(from: &Mappings, to: &Mappings) -> Mappings {
    let mut out = Mappings::new();

    for (src, intermediate) in from.packages() {
        let mapped = to.map_package(&package_to_dotted(intermediate));
        out.packages.insert(src.clone(), dotted_to_package(&mapped));
    }

    for (src, intermediate) in from.classes() {
        out.classes.insert(src.clone(), to.map_class(intermediate));
    }

    for (key, intermediate_name) in from.fields() {
        let owner = from.map_class(&key.owner);
        let descriptor = key.descriptor.as_deref().map(|d| from.map_descriptor(d));
        let bridged = to.map_field(&owner, intermediate_name, descriptor.as_deref());
        out.fields.insert(key.clone(), bridged);
    }

    for (key, intermediate_name) in from.methods() {
        let owner = from.map_class(&key.owner);
        let descriptor = from.map_descriptor(&key.descriptor);
        let bridged = to.map_method(&owner, intermediate_name, &descriptor);
        out.methods.insert(key.clone(), bridged);
    }

    out
}
