//! # Remap Mappings
//!
//! Core symbol-remapping model: renaming rules for the four linked
//! namespaces of a compiled artifact (packages, classes, fields, methods),
//! plus the derived operations built on top of them.
//!
//! ## Architecture
//!
//! ```text
//! Mappings (four ordered tables + cached reverse)
//!     │
//!     ├──> map_* queries (total; miss returns the input unchanged)
//!     │    ├─> longest-prefix package resolution
//!     │    ├─> class package re-derivation
//!     │    └─> descriptor rewriting
//!     │
//!     ├──> reverse()   — lazily derived, kept consistent across mutations
//!     ├──> bridge()    — compose two mappings through a shared namespace
//!     └──> fill()      — propagate member renames down a class hierarchy
//! ```
//!
//! ## Example
//!
//! ```rust
//! use remap_mappings::Mappings;
//!
//! let mut mappings = Mappings::new();
//! mappings.add_package("com/example/", "a/", false).unwrap();
//! mappings.add_class("com/example/Engine", "com/example/a", false).unwrap();
//!
//! assert_eq!(mappings.map_class("com/example/Engine"), "a/a");
//! assert_eq!(mappings.map_package("com.example.util"), "a.util");
//! ```

mod bridge;
mod descriptor;
mod error;
mod filler;
mod reverse;
mod table;
mod types;

pub use bridge::bridge;
pub use descriptor::{class_references, map_descriptor};
pub use error::{MappingError, Result};
pub use filler::{fill, ClassInfo, HierarchyResolver, MemberInfo, ResolvedClass};
pub use table::Mappings;
pub use types::{normalize_package, FieldKey, MethodKey, DEFAULT_PACKAGE};
