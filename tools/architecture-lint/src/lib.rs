//! Layering lint for the admin console crate.
//!
//! `console/src` is organised as a hexagon:
//!
//! - `domain` holds resources, controllers, and ports. It may only reach other
//!   `domain` modules and must stay free of I/O: no HTTP client, no sockets,
//!   no filesystem, no terminal output.
//! - `inbound` is the CLI. It may reach `app`, `config`, and `domain`, but
//!   never an `outbound` adapter or the HTTP client.
//! - `outbound` holds the adapters behind the ports. It may reach `domain`
//!   only, and never renders to the terminal.
//! - Files at the crate root (`app.rs`, `config.rs`, `lib.rs`, `main.rs`)
//!   compose the layers and are not restricted.
//!
//! Every path mentioned in a file (`use` trees, expressions, types, and macro
//! invocations) is resolved against the file's own module path, so
//! `super::` and `self::` count as the layer they land in.
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::{self, Visit};

const CRATE_NAME: &str = "admin_console";
const PRINT_MACROS: &[&str] = &["print", "println", "eprint", "eprintln", "dbg"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `console/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Reading `console/src` failed.
    Io(io::Error),
    /// A file is not valid Rust.
    Parse { file: PathBuf, message: String },
    /// A file lives outside the known layers and the crate root.
    UnknownLayer { file: PathBuf },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read console sources: {err}"),
            Self::Parse { file, message } => {
                write!(f, "{} is not valid Rust: {message}", file.display())
            }
            Self::UnknownLayer { file } => write!(
                f,
                "{} is outside domain/, inbound/, and outbound/",
                file.display()
            ),
            Self::Violations(violations) => {
                writeln!(f, "{} layering violation(s):", violations.len())?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `console/src`.
    pub file: PathBuf,
    /// Rust source text.
    pub contents: String,
}

/// Lint every `.rs` file below `console_dir/src`.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] listing every broken rule,
/// or the first read, parse, or placement failure.
pub fn lint_console_sources(console_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = console_dir.join("src");
    let mut sources = Vec::new();
    collect_sources(&src_dir, &src_dir, &mut sources)?;
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    lint_sources(&sources)
}

/// Lint in-memory sources; paths are relative to `console/src`.
///
/// # Errors
///
/// Same as [`lint_console_sources`], minus I/O.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::UnknownLayer {
            file: source.file.clone(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        let Some(rules) = layer.rules() else {
            continue;
        };
        let mut references = References::new(module_path(&source.file));
        references.visit_file(&parsed);
        violations.extend(
            rules
                .check(&references)
                .into_iter()
                .map(|message| Violation {
                    file: source.file.clone(),
                    message,
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
    Composition,
}

/// What one layer may depend on.
struct LayerRules {
    name: &'static str,
    /// Crate-internal top-level modules the layer may reach.
    allowed_modules: &'static [&'static str],
    /// External path prefixes the layer must not mention.
    forbidden_paths: &'static [&'static [&'static str]],
    /// Whether terminal output macros are banned.
    forbids_printing: bool,
}

const DOMAIN_RULES: LayerRules = LayerRules {
    name: "domain",
    allowed_modules: &["domain"],
    forbidden_paths: &[
        &["reqwest"],
        &["url"],
        &["clap"],
        &["color_eyre"],
        &["ortho_config"],
        &["tracing_subscriber"],
        &["cap_std"],
        &["std", "fs"],
        &["std", "net"],
        &["std", "process"],
        &["tokio", "fs"],
        &["tokio", "net"],
        &["tokio", "process"],
    ],
    forbids_printing: true,
};

const INBOUND_RULES: LayerRules = LayerRules {
    name: "inbound",
    allowed_modules: &["app", "config", "domain", "inbound"],
    forbidden_paths: &[&["reqwest"], &["std", "net"], &["tokio", "net"]],
    forbids_printing: false,
};

const OUTBOUND_RULES: LayerRules = LayerRules {
    name: "outbound",
    allowed_modules: &["domain", "outbound"],
    forbidden_paths: &[
        &["clap"],
        &["color_eyre"],
        &["ortho_config"],
        &["tracing_subscriber"],
    ],
    forbids_printing: true,
};

impl Layer {
    fn of(relative_path: &Path) -> Option<Self> {
        let mut components = relative_path.components();
        let first = components.next()?.as_os_str().to_str()?;
        if components.next().is_none() {
            return first.ends_with(".rs").then_some(Self::Composition);
        }
        match first {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn rules(self) -> Option<&'static LayerRules> {
        match self {
            Self::Domain => Some(&DOMAIN_RULES),
            Self::Inbound => Some(&INBOUND_RULES),
            Self::Outbound => Some(&OUTBOUND_RULES),
            Self::Composition => None,
        }
    }
}

impl LayerRules {
    fn check(&self, references: &References) -> BTreeSet<String> {
        let mut messages = BTreeSet::new();
        for target in &references.internal {
            if !self.allowed_modules.contains(&target.as_str()) {
                messages.insert(format!(
                    "{} may only depend on {}, found crate::{target}",
                    self.name,
                    self.allowed_list()
                ));
            }
        }
        for path in &references.external {
            if let Some(prefix) = self.forbidden_prefix(path) {
                messages.insert(format!("{} must not use `{prefix}`", self.name));
            }
        }
        if self.forbids_printing {
            for name in &references.macros {
                if PRINT_MACROS.contains(&name.as_str()) {
                    messages.insert(format!(
                        "{} must not write to the terminal with `{name}!`",
                        self.name
                    ));
                }
            }
        }
        messages
    }

    fn allowed_list(&self) -> String {
        self.allowed_modules
            .iter()
            .map(|module| format!("crate::{module}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn forbidden_prefix(&self, path: &[String]) -> Option<String> {
        self.forbidden_paths
            .iter()
            .find(|prefix| {
                prefix.len() <= path.len()
                    && prefix.iter().zip(path).all(|(expected, seen)| *expected == seen)
            })
            .map(|prefix| prefix.join("::"))
    }
}

/// Module path of a file, e.g. `domain/resources/mod.rs` is `domain::resources`.
fn module_path(relative_path: &Path) -> Vec<String> {
    let mut segments = relative_path
        .iter()
        .filter_map(|part| part.to_str())
        .map(|part| part.trim_end_matches(".rs").to_owned())
        .collect::<Vec<_>>();
    if segments.last().is_some_and(|last| last == "mod") {
        segments.pop();
    }
    segments
}

/// Paths mentioned by one file, split by where they point.
struct References {
    /// Module path of the item being visited (file path plus inline `mod`s).
    scope: Vec<String>,
    /// Crate-internal top-level modules reached.
    internal: BTreeSet<String>,
    /// Paths rooted outside the crate.
    external: BTreeSet<Vec<String>>,
    /// Names of invoked macros.
    macros: BTreeSet<String>,
}

impl References {
    fn new(scope: Vec<String>) -> Self {
        Self {
            scope,
            internal: BTreeSet::new(),
            external: BTreeSet::new(),
            macros: BTreeSet::new(),
        }
    }

    fn record(&mut self, segments: Vec<String>) {
        let Some(first) = segments.first() else {
            return;
        };
        match first.as_str() {
            "crate" | CRATE_NAME => {
                if let Some(module) = segments.get(1) {
                    self.record_internal(module);
                }
            }
            "self" | "super" => {
                let mut base = self.scope.clone();
                let mut rest = segments.iter().peekable();
                if rest.next_if(|segment| *segment == "self").is_none() {
                    while rest.next_if(|segment| *segment == "super").is_some() {
                        base.pop();
                    }
                }
                let root = base.first().or_else(|| rest.peek().copied()).cloned();
                if let Some(root) = root {
                    self.record_internal(&root);
                }
            }
            "domain" | "inbound" | "outbound" => {
                let module = first.clone();
                self.record_internal(&module);
            }
            _ => {
                self.external.insert(segments);
            }
        }
    }

    fn record_internal(&mut self, module: &str) {
        if module != "*" {
            self.internal.insert(module.to_owned());
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.record(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.record(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.record(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for References {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record(
            node.segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect(),
        );
        visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        self.scope.push(node.ident.to_string());
        visit::visit_item_mod(self, node);
        self.scope.pop();
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        if let Some(last) = node.path.segments.last() {
            self.macros.insert(last.ident.to_string());
        }
        visit::visit_macro(self, node);
    }
}

fn collect_sources(
    src_root: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources(src_root, &path, sources)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let file = path
                .strip_prefix(src_root)
                .map_or_else(|_| path.clone(), Path::to_path_buf);
            sources.push(LintSource {
                contents: fs::read_to_string(&path)?,
                file,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
