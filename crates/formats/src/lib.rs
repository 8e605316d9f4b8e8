//! # Remap Formats
//!
//! Loaders for the four external mapping file formats, each a line-oriented
//! state machine producing a [`remap_mappings::Mappings`] table:
//!
//! - **Proguard** — `name -> newName:` classes with indented typed members
//! - **Tiny v1** — tab-separated `CLASS`/`FIELD`/`METHOD` records with one
//!   name column per header namespace
//! - **Tiny v2** — indentation-nested records with properties, comments,
//!   and parameter metadata
//! - **TSRG v1** — bare class lines with tab-indented member renames
//!
//! Loaders consume an ordered sequence of already-decoded lines (line
//! supply and decoding are the caller's concern) and either fully succeed
//! or fail with a [`FormatError`] naming the offending input; a failed
//! parse yields no usable mapping.
//!
//! ## Example
//!
//! ```rust
//! use remap_formats::{detect_format, Format, TsrgV1Loader};
//!
//! let source = "a/b/Engine x/y/Engine\n\tspeed newSpeed\n";
//! assert_eq!(detect_format(source.lines()), Some(Format::TsrgV1));
//!
//! let mappings = TsrgV1Loader::new().parse_str(source).unwrap();
//! assert_eq!(mappings.map_class("a/b/Engine"), "x/y/Engine");
//! ```

mod detect;
mod error;
mod proguard;
mod tiny_v1;
mod tiny_v2;
mod tsrg;

pub use detect::{detect_format, Format};
pub use error::{FormatError, Result};
pub use proguard::ProguardLoader;
pub use tiny_v1::TinyV1Loader;
pub use tiny_v2::{
    ClassMeta, MemberMeta, ParamMeta, TinyV2Document, TinyV2Loader, TinyV2Metadata,
};
pub use tsrg::TsrgV1Loader;
