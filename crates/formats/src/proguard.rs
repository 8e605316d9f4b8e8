//! Proguard mapping file loader.
//!
//! Three line shapes, matched by fixed patterns:
//!
//! ```text
//! com.example.Engine -> a.b.c:
//!     java.lang.String name -> a
//!     13:13:void update(int,com.example.Engine) -> b
//! ```
//!
//! Class lines set the current owner context; member lines are four-space
//! indented, with optional `start:end` line-number ranges around method
//! records. Types are written in source syntax and are translated to the
//! internal descriptor syntax before storing.

use crate::error::{FormatError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use remap_mappings::Mappings;

static CLASS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+) -> (\S+):$").expect("class pattern compiles"));

static METHOD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^    (?:\d+:\d+:)?([^\s(]+) ([^\s(]+)\(([^)]*)\)(?::\d+(?::\d+)?)? -> (\S+)$")
        .expect("method pattern compiles")
});

static FIELD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^    ([^\s(]+) ([^\s(]+) -> (\S+)$").expect("field pattern compiles")
});

/// Loader for Proguard `mapping.txt` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProguardLoader;

impl ProguardLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self
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
        let mut mappings = Mappings::new();
        let mut current_class: Option<String> = None;

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_no = idx + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(caps) = CLASS_LINE.captures(line) {
                let from = caps[1].replace('.', "/");
                let to = caps[2].replace('.', "/");
                mappings.add_class(&from, &to, false)?;
                current_class = Some(from);
                continue;
            }

            if let Some(caps) = METHOD_LINE.captures(line) {
                let owner = current_class
                    .as_deref()
                    .ok_or_else(|| FormatError::malformed_line(line_no, line))?;
                let descriptor = method_descriptor(&caps[3], &caps[1]);
                mappings.add_method(owner, &caps[2], &descriptor, &caps[4], false)?;
                continue;
            }

            if let Some(caps) = FIELD_LINE.captures(line) {
                let owner = current_class
                    .as_deref()
                    .ok_or_else(|| FormatError::malformed_line(line_no, line))?;
                let descriptor = source_type_to_descriptor(&caps[1]);
                mappings.add_field(owner, &caps[2], Some(&descriptor), &caps[3], false)?;
                continue;
            }

            return Err(FormatError::malformed_line(line_no, line));
        }

        log::debug!(
            "parsed proguard mapping: {} classes, {} fields, {} methods",
            mappings.classes().len(),
            mappings.fields().len(),
            mappings.methods().len()
        );
        Ok(mappings)
    }
}

/// Build an internal method descriptor from source-syntax argument and
/// return types (`int,java.lang.String` + `void` → `(ILjava/lang/String;)V`).
fn method_descriptor(args: &str, return_type: &str) -> String {
    let mut descriptor = String::from("(");
    for arg in args.split(',').filter(|arg| !arg.is_empty()) {
        descriptor.push_str(&source_type_to_descriptor(arg));
    }
    descriptor.push(')');
    descriptor.push_str(&source_type_to_descriptor(return_type));
    descriptor
}

/// Translate one source-syntax type (`int`, `java.lang.String`, `Foo[]`)
/// into the internal descriptor syntax (`I`, `Ljava/lang/String;`, `[LFoo;`).
fn source_type_to_descriptor(ty: &str) -> String {
    let mut dimensions = 0;
    let mut base = ty;
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped;
        dimensions += 1;
    }
    let element = match base {
        "void" => "V".to_string(),
        "boolean" => "Z".to_string(),
        "byte" => "B".to_string(),
        "char" => "C".to_string(),
        "short" => "S".to_string(),
        "int" => "I".to_string(),
        "long" => "J".to_string(),
        "float" => "F".to_string(),
        "double" => "D".to_string(),
        class => format!("L{};", class.replace('.', "/")),
    };
    format!("{}{}", "[".repeat(dimensions), element)
}
