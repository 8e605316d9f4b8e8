//! TSRG v1 mapping file loader.
//!
//! ```text
//! a/b/Engine x/y/Engine
//! \tfield newField
//! \trun (ILa/b/Engine;)V newRun
//! ```
//!
//! Unindented two-column lines rename a class and set the owner context;
//! tab-indented two-column lines are field renames (no descriptor in this
//! format), tab-indented three-column lines are method renames. Anything
//! else is malformed.

use crate::error::{FormatError, Result};
use remap_mappings::Mappings;

/// Loader for TSRG v1 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsrgV1Loader;

impl TsrgV1Loader {
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

            match line.strip_prefix('\t') {
                Some(member) => {
                    let owner = current_class
                        .as_deref()
                        .ok_or_else(|| FormatError::malformed_line(line_no, line))?;
                    let columns: Vec<&str> = member.split(' ').collect();
                    match columns.as_slice() {
                        [name, new_name] => {
                            mappings.add_field(owner, name, None, new_name, false)?;
                        }
                        [name, descriptor, new_name] => {
                            mappings.add_method(owner, name, descriptor, new_name, false)?;
                        }
                        _ => return Err(FormatError::malformed_line(line_no, line)),
                    }
                }
                None => {
                    let columns: Vec<&str> = line.split(' ').collect();
                    match columns.as_slice() {
                        [from, to] => {
                            mappings.add_class(from, to, false)?;
                            current_class = Some((*from).to_string());
                        }
                        _ => return Err(FormatError::malformed_line(line_no, line)),
                    }
                }
            }
        }

        log::debug!(
            "parsed tsrg mapping: {} classes, {} fields, {} methods",
            mappings.classes().len(),
            mappings.fields().len(),
            mappings.methods().len()
        );
        Ok(mappings)
    }
}
