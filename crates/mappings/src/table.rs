use crate::descriptor;
use crate::error::Result;
use crate::reverse;
use crate::types::{
    ensure_no_dot, normalize_package, package_to_dotted, FieldKey, MethodKey, DEFAULT_PACKAGE,
};
use indexmap::IndexMap;

/// Which table a mutation touched — determines how far the cached reverse
/// must be recomputed (packages invalidate everything below them, classes
/// invalidate members, members only themselves).
enum Level {
    Package,
    Class,
    Field,
    Method,
}

/// Renaming rules for the four linked namespaces.
///
/// Four insertion-order-preserving tables (package, class, field, method)
/// plus a lazily materialized reverse instance kept consistent across
/// mutations. Query operations are total: a miss returns the input
/// unchanged, matching the best-effort semantics expected by tools holding
/// only partial mapping data.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Mappings {
    pub(crate) packages: IndexMap<String, String>,
    pub(crate) classes: IndexMap<String, String>,
    pub(crate) fields: IndexMap<FieldKey, String>,
    pub(crate) methods: IndexMap<MethodKey, String>,
    pub(crate) reverse: Option<Box<Mappings>>,
}

impl Mappings {
    /// Create an empty mapping table
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored package mappings (`from/` → `to/`, plus the `.` sentinel)
    pub fn packages(&self) -> &IndexMap<String, String> {
        &self.packages
    }

    /// Stored class mappings
    pub fn classes(&self) -> &IndexMap<String, String> {
        &self.classes
    }

    /// Stored field mappings
    pub fn fields(&self) -> &IndexMap<FieldKey, String> {
        &self.fields
    }

    /// Stored method mappings
    pub fn methods(&self) -> &IndexMap<MethodKey, String> {
        &self.methods
    }

    /// True when no table holds any entry
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
            && self.classes.is_empty()
            && self.fields.is_empty()
            && self.methods.is_empty()
    }

    /// Register a package rename.
    ///
    /// Both keys are normalized to the trailing-separator convention (the
    /// default package becomes `.`). With `skip_if_exists`, an already
    /// mapped `from` is left untouched.
    pub fn add_package(&mut self, from: &str, to: &str, skip_if_exists: bool) -> Result<()> {
        let from = normalize_package(from)?;
        let to = normalize_package(to)?;
        if skip_if_exists && self.packages.contains_key(&from) {
            return Ok(());
        }
        self.packages.insert(from, to);
        self.refresh_reverse(Level::Package);
        Ok(())
    }

    /// Register a class rename. Keys must not contain `.`.
    pub fn add_class(&mut self, from: &str, to: &str, skip_if_exists: bool) -> Result<()> {
        ensure_no_dot(from, "class keys")?;
        ensure_no_dot(to, "class keys")?;
        if skip_if_exists && self.classes.contains_key(from) {
            return Ok(());
        }
        self.classes.insert(from.to_string(), to.to_string());
        self.refresh_reverse(Level::Class);
        Ok(())
    }

    /// Register a field rename under `owner`, with an optional descriptor.
    pub fn add_field(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: Option<&str>,
        new_name: &str,
        skip_if_exists: bool,
    ) -> Result<()> {
        ensure_no_dot(owner, "class keys")?;
        ensure_no_dot(name, "field names")?;
        let key = FieldKey::new(owner, name, descriptor.map(str::to_string));
        if skip_if_exists && self.fields.contains_key(&key) {
            return Ok(());
        }
        self.fields.insert(key, new_name.to_string());
        self.refresh_reverse(Level::Field);
        Ok(())
    }

    /// Register a method rename under `owner`. The descriptor is mandatory.
    pub fn add_method(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
        new_name: &str,
        skip_if_exists: bool,
    ) -> Result<()> {
        ensure_no_dot(owner, "class keys")?;
        ensure_no_dot(name, "method names")?;
        let key = MethodKey::new(owner, name, descriptor);
        if skip_if_exists && self.methods.contains_key(&key) {
            return Ok(());
        }
        self.methods.insert(key, new_name.to_string());
        self.refresh_reverse(Level::Method);
        Ok(())
    }

    /// Map a dotted package name through the longest matching stored prefix.
    ///
    /// Candidate prefixes are tried from most-specific (all segments) to
    /// least-specific (one segment); segments past the match are appended
    /// unchanged. No match returns the input unchanged. The empty name
    /// resolves through the `.` sentinel entry when present.
    #[must_use]
    pub fn map_package(&self, name: &str) -> String {
        if name.is_empty() {
            return match self.packages.get(DEFAULT_PACKAGE) {
                Some(mapped) => package_to_dotted(mapped),
                None => String::new(),
            };
        }
        let segments: Vec<&str> = name.split('.').collect();
        for take in (1..=segments.len()).rev() {
            let candidate = format!("{}/", segments[..take].join("/"));
            if let Some(mapped) = self.packages.get(&candidate) {
                let mapped = package_to_dotted(mapped);
                let rest = segments[take..].join(".");
                return match (mapped.is_empty(), rest.is_empty()) {
                    (true, _) => rest,
                    (_, true) => mapped,
                    _ => format!("{mapped}.{rest}"),
                };
            }
        }
        name.to_string()
    }

    /// Map a class key.
    ///
    /// A class-table miss keeps the input; when any package mappings exist,
    /// the package-qualified form of the (possibly renamed) class is
    /// re-derived through [`Mappings::map_package`].
    #[must_use]
    pub fn map_class(&self, name: &str) -> String {
        let renamed = match self.classes.get(name) {
            Some(to) => to.clone(),
            None => name.to_string(),
        };
        if self.packages.is_empty() {
            return renamed;
        }
        match renamed.rfind('/') {
            Some(idx) => {
                let package = renamed[..idx].replace('/', ".");
                let simple = &renamed[idx + 1..];
                let mapped = self.map_package(&package);
                if mapped.is_empty() {
                    simple.to_string()
                } else {
                    format!("{}/{}", mapped.replace('.', "/"), simple)
                }
            }
            None => {
                let mapped = self.map_package("");
                if mapped.is_empty() {
                    renamed
                } else {
                    format!("{}/{}", mapped.replace('.', "/"), renamed)
                }
            }
        }
    }

    /// Map a field name.
    ///
    /// The exact (owner, name, descriptor) key is tried first, then the
    /// descriptor-less (owner, name) key; neither matching keeps `name`.
    #[must_use]
    pub fn map_field(&self, owner: &str, name: &str, descriptor: Option<&str>) -> String {
        if let Some(desc) = descriptor {
            let exact = FieldKey::new(owner, name, Some(desc.to_string()));
            if let Some(mapped) = self.fields.get(&exact) {
                return mapped.clone();
            }
        }
        let fallback = FieldKey::new(owner, name, None);
        match self.fields.get(&fallback) {
            Some(mapped) => mapped.clone(),
            None => name.to_string(),
        }
    }

    /// Map a method name. Exact-key lookup only — overloads never
    /// cross-resolve.
    #[must_use]
    pub fn map_method(&self, owner: &str, name: &str, descriptor: &str) -> String {
        let key = MethodKey::new(owner, name, descriptor);
        match self.methods.get(&key) {
            Some(mapped) => mapped.clone(),
            None => name.to_string(),
        }
    }

    /// Remap every class reference inside a field or method descriptor.
    #[must_use]
    pub fn map_descriptor(&self, desc: &str) -> String {
        descriptor::map_descriptor(desc, |class| self.map_class(class))
    }

    /// Access the reverse mapping, materializing it on first use.
    ///
    /// Once materialized, every mutation of this table recomputes the
    /// affected reverse levels before returning, so the instance handed out
    /// here is always consistent with the forward state.
    pub fn reverse(&mut self) -> &Mappings {
        if self.reverse.is_none() {
            let mut rev = Mappings::new();
            reverse::rebuild_all(self, &mut rev);
            self.reverse = Some(Box::new(rev));
        }
        self.reverse
            .as_deref()
            .expect("reverse cache was materialized above")
    }

    /// Deep-clone the four tables into a new, unlinked instance.
    #[must_use]
    pub fn copy(&self) -> Mappings {
        Mappings {
            packages: self.packages.clone(),
            classes: self.classes.clone(),
            fields: self.fields.clone(),
            methods: self.methods.clone(),
            reverse: None,
        }
    }

    /// A fresh empty instance (naming mirrors [`Mappings::copy`]).
    #[must_use]
    pub fn empty_copy(&self) -> Mappings {
        Mappings::new()
    }

    /// Deep-clone with all four tables re-ordered by key.
    ///
    /// The default tables preserve insertion order; this is the ordering
    /// control for callers that want deterministic sorted output.
    #[must_use]
    pub fn copy_sorted(&self) -> Mappings {
        let mut copy = self.copy();
        copy.packages.sort_keys();
        copy.classes.sort_keys();
        copy.fields.sort_keys();
        copy.methods.sort_keys();
        copy
    }

    /// Detach the cached reverse instance, if any, and return it.
    ///
    /// Neither side's tables are altered; both end up unlinked.
    pub fn isolate(&mut self) -> Option<Mappings> {
        self.reverse.take().map(|boxed| *boxed)
    }

    fn refresh_reverse(&mut self, level: Level) {
        if let Some(mut rev) = self.reverse.take() {
            match level {
                Level::Package => reverse::rebuild_all(self, &mut rev),
                Level::Class => reverse::rebuild_from_classes(self, &mut rev),
                Level::Field => reverse::rebuild_fields(self, &mut rev),
                Level::Method => reverse::rebuild_methods(self, &mut rev),
            }
            self.reverse = Some(rev);
        }
    }
}

impl Clone for Mappings {
    /// Clones are unlinked: the reverse cache never travels with a copy.
    fn clone(&self) -> Self {
        self.copy()
    }
}
