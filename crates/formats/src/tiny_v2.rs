//! Tiny v2 mapping file loader.
//!
//! ```text
//! tiny\t2\t0\tofficial\tnamed
//! \tescaped-names
//! c\ta\tcom/example/Engine
//! \tc\tThe main engine class.
//! \tf\tI\tb\tspeed
//! \t\tc\tCurrent speed.
//! \tm\t(I)V\tc\tupdate
//! \t\tp\t1\t\tamount
//! \t\t\tc\tTicks to advance.
//! ```
//!
//! The header declares the namespace columns. A leading run of single-tab
//! lines before the first class are key/value properties. After that,
//! indentation depth encodes nesting: depth 0 `c` lines are classes, depth
//! 1 `f`/`m` lines are fields/methods, depth 2 `p` lines are method
//! parameters, and a `c` line at depths 1–3 is a comment attached to the
//! nearest enclosing class, member, or parameter.
//!
//! Metadata (comments, parameter names, member descriptors) is buffered in
//! open records governed by a commit/flush rule: a line at depth *d* first
//! flushes any open record at depth ≥ *d* — committing it when it carries
//! information, discarding it otherwise — before the line's own record is
//! opened or updated. End of input flushes everything. Collecting metadata
//! is optional and never changes which renames are extracted.

use crate::error::{FormatError, Result};
use indexmap::IndexMap;
use remap_mappings::Mappings;
use serde::{Deserialize, Serialize};

/// Everything extracted from one Tiny v2 parse.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TinyV2Document {
    /// The extracted from→to renames
    pub mappings: Mappings,

    /// Header properties, in declaration order (value column is optional)
    pub properties: IndexMap<String, Option<String>>,

    /// Collected metadata; `None` when collection was disabled
    pub metadata: Option<TinyV2Metadata>,
}

/// Javadoc and parameter-name records collected alongside the renames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TinyV2Metadata {
    /// Classes that carried metadata of their own or on their members
    pub classes: Vec<ClassMeta>,
}

/// Metadata attached to one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMeta {
    /// Class name in the target namespace
    pub name: String,

    /// Class comment, when present
    pub comment: Option<String>,

    /// Fields that carried metadata
    #[serde(default)]
    pub fields: Vec<MemberMeta>,

    /// Methods that carried metadata
    #[serde(default)]
    pub methods: Vec<MemberMeta>,
}

/// Metadata attached to one field or method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberMeta {
    /// Member name in the target namespace
    pub name: String,

    /// Descriptor re-expressed in the target namespace's types
    pub descriptor: String,

    /// Member comment, when present
    pub comment: Option<String>,

    /// Parameter records (methods only)
    #[serde(default)]
    pub parameters: Vec<ParamMeta>,
}

/// Metadata attached to one method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamMeta {
    /// Local-variable index
    pub index: usize,

    /// Parameter name in the target namespace, when present
    pub name: Option<String>,

    /// Parameter comment, when present
    pub comment: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Field,
    Method,
}

struct PendingMember {
    kind: MemberKind,
    /// Owner class name in the from namespace
    owner: String,
    /// Descriptor in the base namespace, translated at finalization
    descriptor: String,
    from_name: String,
    to_name: String,
}

/// Loader for Tiny v2 files, configured with the source and target
/// namespace names to extract.
#[derive(Debug, Clone)]
pub struct TinyV2Loader {
    from_ns: String,
    to_ns: String,
    collect_metadata: bool,
}

impl TinyV2Loader {
    /// Create a loader extracting `from_ns` → `to_ns` renames.
    pub fn new(from_ns: impl Into<String>, to_ns: impl Into<String>) -> Self {
        Self {
            from_ns: from_ns.into(),
            to_ns: to_ns.into(),
            collect_metadata: false,
        }
    }

    /// Toggle metadata collection (comments, parameter names).
    #[must_use]
    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.collect_metadata = enabled;
        self
    }

    /// Parse a complete mapping source, splitting it into lines.
    pub fn parse_str(&self, source: &str) -> Result<TinyV2Document> {
        self.parse_lines(source.lines())
    }

    /// Parse an ordered sequence of already-decoded lines.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<TinyV2Document>
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
        let valid = columns.len() >= 3
            && columns[0] == "tiny"
            && columns[1] == "2"
            && columns[2].parse::<u32>().is_ok();
        if !valid {
            return Err(FormatError::header_version(header));
        }
        let namespaces = &columns[3..];
        let from_idx = resolve_namespace(namespaces, &self.from_ns)?;
        let to_idx = resolve_namespace(namespaces, &self.to_ns)?;

        let mut state = ParseState::new(self.collect_metadata, namespaces.len(), from_idx, to_idx);

        for (idx, line) in lines.enumerate() {
            state.consume(idx + 2, line.as_ref())?;
        }
        let document = state.finish()?;

        log::debug!(
            "parsed tiny v2 mapping ({} -> {}): {} classes, {} fields, {} methods",
            self.from_ns,
            self.to_ns,
            document.mappings.classes().len(),
            document.mappings.fields().len(),
            document.mappings.methods().len()
        );
        Ok(document)
    }
}

fn resolve_namespace(namespaces: &[&str], name: &str) -> Result<usize> {
    namespaces
        .iter()
        .position(|ns| *ns == name)
        .ok_or_else(|| FormatError::namespace_not_found(name))
}

struct ParseState {
    collect_metadata: bool,
    ns_count: usize,
    from_idx: usize,
    to_idx: usize,
    escaped: bool,
    seen_class: bool,

    /// base → from and base → to class translation tables
    helper_from: Mappings,
    helper_to: Mappings,
    output: Mappings,
    pending: Vec<PendingMember>,
    properties: IndexMap<String, Option<String>>,

    /// from-namespace name of the current class, owner of buffered members
    current_class: Option<String>,
    current_member: Option<MemberKind>,
    param_open: bool,

    committed: Vec<ClassMeta>,
    open_class: Option<ClassMeta>,
    open_member: Option<(MemberKind, MemberMeta)>,
    open_param: Option<ParamMeta>,
}

impl ParseState {
    fn new(collect_metadata: bool, ns_count: usize, from_idx: usize, to_idx: usize) -> Self {
        Self {
            collect_metadata,
            ns_count,
            from_idx,
            to_idx,
            escaped: false,
            seen_class: false,
            helper_from: Mappings::new(),
            helper_to: Mappings::new(),
            output: Mappings::new(),
            pending: Vec::new(),
            properties: IndexMap::new(),
            current_class: None,
            current_member: None,
            param_open: false,
            committed: Vec::new(),
            open_class: None,
            open_member: None,
            open_param: None,
        }
    }

    fn consume(&mut self, line_no: usize, line: &str) -> Result<()> {
        let depth = line.len() - line.trim_start_matches('\t').len();
        let content = &line[depth..];
        if content.is_empty() {
            return Err(FormatError::malformed_line(line_no, line));
        }
        let columns: Vec<&str> = content.split('\t').collect();

        if !self.seen_class && depth == 1 {
            self.property(&columns);
            return Ok(());
        }

        match (depth, columns[0]) {
            (0, "c") if columns.len() == 1 + self.ns_count => {
                self.flush_to_depth(0);
                self.begin_class(&columns[1..])?;
            }
            (1, "f") if columns.len() == 2 + self.ns_count => {
                self.flush_to_depth(1);
                self.begin_member(MemberKind::Field, &columns[1..], line_no, line)?;
            }
            (1, "m") if columns.len() == 2 + self.ns_count => {
                self.flush_to_depth(1);
                self.begin_member(MemberKind::Method, &columns[1..], line_no, line)?;
            }
            (2, "p") if columns.len() == 2 + self.ns_count => {
                if self.current_member != Some(MemberKind::Method) {
                    return Err(FormatError::malformed_line(line_no, line));
                }
                self.flush_to_depth(2);
                self.begin_param(&columns[1..], line_no, line)?;
            }
            (1, "c") => {
                if self.current_class.is_none() {
                    return Err(FormatError::malformed_line(line_no, line));
                }
                self.flush_to_depth(1);
                let text = self.comment_text(&columns[1..]);
                if let Some(class) = self.open_class.as_mut() {
                    append_comment(&mut class.comment, &text);
                }
            }
            (2, "c") => {
                if self.current_member.is_none() {
                    return Err(FormatError::malformed_line(line_no, line));
                }
                self.flush_to_depth(2);
                let text = self.comment_text(&columns[1..]);
                if let Some((_, member)) = self.open_member.as_mut() {
                    append_comment(&mut member.comment, &text);
                }
            }
            (3, "c") => {
                if !self.param_open {
                    return Err(FormatError::malformed_line(line_no, line));
                }
                let text = self.comment_text(&columns[1..]);
                if let Some(param) = self.open_param.as_mut() {
                    append_comment(&mut param.comment, &text);
                }
            }
            _ => return Err(FormatError::malformed_line(line_no, line)),
        }
        Ok(())
    }

    fn property(&mut self, columns: &[&str]) {
        let key = self.decode(columns[0]);
        let value = if columns.len() > 1 {
            Some(self.decode(&columns[1..].join("\t")))
        } else {
            None
        };
        if key == "escaped-names" {
            self.escaped = true;
        }
        self.properties.insert(key, value);
    }

    fn begin_class(&mut self, names: &[&str]) -> Result<()> {
        self.seen_class = true;
        let base = self.decode(names[0]);
        let from_name = self.resolved_name(names, self.from_idx, &base);
        let to_name = self.resolved_name(names, self.to_idx, &base);

        self.helper_from.add_class(&base, &from_name, false)?;
        self.helper_to.add_class(&base, &to_name, false)?;
        self.output.add_class(&from_name, &to_name, false)?;

        if self.collect_metadata {
            self.open_class = Some(ClassMeta {
                name: to_name.clone(),
                ..ClassMeta::default()
            });
        }
        self.current_class = Some(from_name);
        Ok(())
    }

    fn begin_member(
        &mut self,
        kind: MemberKind,
        columns: &[&str],
        line_no: usize,
        line: &str,
    ) -> Result<()> {
        let owner = match self.current_class.as_deref() {
            Some(owner) => owner.to_string(),
            None => return Err(FormatError::malformed_line(line_no, line)),
        };
        let descriptor = self.decode(columns[0]);
        let names = &columns[1..];
        let base = self.decode(names[0]);
        let from_name = self.resolved_name(names, self.from_idx, &base);
        let to_name = self.resolved_name(names, self.to_idx, &base);

        if self.collect_metadata {
            self.open_member = Some((
                kind,
                MemberMeta {
                    name: to_name.clone(),
                    descriptor: descriptor.clone(),
                    ..MemberMeta::default()
                },
            ));
        }
        self.pending.push(PendingMember {
            kind,
            owner,
            descriptor,
            from_name,
            to_name,
        });
        self.current_member = Some(kind);
        Ok(())
    }

    fn begin_param(&mut self, columns: &[&str], line_no: usize, line: &str) -> Result<()> {
        let index: usize = columns[0]
            .parse()
            .map_err(|_| FormatError::malformed_line(line_no, line))?;
        if self.collect_metadata {
            let names = &columns[1..];
            let base = self.decode(names[0]);
            let name = self.resolved_name(names, self.to_idx, &base);
            self.open_param = Some(ParamMeta {
                index,
                name: (!name.is_empty()).then_some(name),
                comment: None,
            });
        }
        self.param_open = true;
        Ok(())
    }

    /// Resolve the name column for a namespace: an empty to-column defaults
    /// to the from-namespace value, and an empty from-column falls back to
    /// the base (first) column.
    fn resolved_name(&self, names: &[&str], idx: usize, base: &str) -> String {
        let raw = names[idx];
        if raw.is_empty() {
            if idx == self.from_idx {
                base.to_string()
            } else {
                let from_raw = names[self.from_idx];
                if from_raw.is_empty() {
                    base.to_string()
                } else {
                    self.decode(from_raw)
                }
            }
        } else {
            self.decode(raw)
        }
    }

    fn comment_text(&self, columns: &[&str]) -> String {
        self.decode(&columns.join("\t"))
    }

    fn decode(&self, text: &str) -> String {
        if self.escaped {
            unescape(text)
        } else {
            text.to_string()
        }
    }

    /// Flush open metadata records at depth ≥ `depth`, deepest first.
    fn flush_to_depth(&mut self, depth: usize) {
        if depth <= 2 {
            self.flush_param();
        }
        if depth <= 1 {
            self.flush_member();
        }
        if depth == 0 {
            self.flush_class();
        }
    }

    fn flush_param(&mut self) {
        self.param_open = false;
        if let Some(param) = self.open_param.take() {
            if param.name.is_some() || param.comment.is_some() {
                if let Some((_, member)) = self.open_member.as_mut() {
                    member.parameters.push(param);
                }
            }
        }
    }

    fn flush_member(&mut self) {
        self.current_member = None;
        if let Some((kind, member)) = self.open_member.take() {
            if member.comment.is_some() || !member.parameters.is_empty() {
                if let Some(class) = self.open_class.as_mut() {
                    match kind {
                        MemberKind::Field => class.fields.push(member),
                        MemberKind::Method => class.methods.push(member),
                    }
                }
            }
        }
    }

    fn flush_class(&mut self) {
        if let Some(class) = self.open_class.take() {
            if class.comment.is_some() || !class.fields.is_empty() || !class.methods.is_empty() {
                self.committed.push(class);
            }
        }
    }

    fn finish(mut self) -> Result<TinyV2Document> {
        self.flush_to_depth(0);

        for member in std::mem::take(&mut self.pending) {
            let descriptor = self.helper_from.map_descriptor(&member.descriptor);
            match member.kind {
                MemberKind::Field => {
                    self.output.add_field(
                        &member.owner,
                        &member.from_name,
                        Some(&descriptor),
                        &member.to_name,
                        false,
                    )?;
                }
                MemberKind::Method => {
                    self.output.add_method(
                        &member.owner,
                        &member.from_name,
                        &descriptor,
                        &member.to_name,
                        false,
                    )?;
                }
            }
        }

        let metadata = if self.collect_metadata {
            // metadata descriptors are re-expressed in the target
            // namespace's types, via the base → to helper
            for class in &mut self.committed {
                for member in class.fields.iter_mut().chain(class.methods.iter_mut()) {
                    member.descriptor = self.helper_to.map_descriptor(&member.descriptor);
                }
            }
            Some(TinyV2Metadata {
                classes: self.committed,
            })
        } else {
            None
        };

        Ok(TinyV2Document {
            mappings: self.output,
            properties: self.properties,
            metadata,
        })
    }
}

fn append_comment(slot: &mut Option<String>, text: &str) {
    match slot {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => *slot = Some(text.to_string()),
    }
}

/// Decode the `\\ \n \r \0 \t` escape sequences used in names, comments,
/// and property values when the `escaped-names` property is present.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
