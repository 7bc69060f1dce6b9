//! Boundary lint for the `paddock` client.
//!
//! Every file under `client/src` except the composition roots (`lib.rs` and
//! `main.rs`) is placed in a scope and parsed with `syn`. Three families of
//! rule are then checked:
//!
//! - reach: the client modules and third-party crates a scope may name, so
//!   the domain stays free of adapters and configuration, and crate-root
//!   `settings` never depends on the CLI
//! - adapter isolation: `outbound::memory` and `outbound::firebase` never
//!   name each other
//! - port shape: public traits in `domain/ports` are `#[async_trait]`,
//!   `Send + Sync`, and mockable under `cfg(test)`
//!
//! A file the lint cannot place is an error, so a new top-level module has to
//! be given a scope before it can land.

mod ports;
mod reach;
mod scope;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::reach::{Mentions, Target};
use crate::scope::{Placement, Scope};

/// Which family of rule a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    /// A scope names a client module it must not depend on.
    LayerReach,
    /// A scope names a third-party crate it must not depend on.
    CrateReach,
    /// One outbound adapter names another.
    AdapterIsolation,
    /// A port trait is missing a required attribute or bound.
    PortShape,
}

/// A single broken rule in one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: PathBuf,
    /// Rule family.
    pub rule: Rule,
    /// What was found.
    pub message: String,
}

/// Failures returned by the lint.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// The source tree could not be read.
    #[error("cannot read client sources: {0}")]
    Io(#[from] io::Error),
    /// A file is not valid Rust.
    #[error("{}: not valid Rust: {message}", file.display())]
    Parse {
        /// File path relative to `client/src`.
        file: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// A file lies outside every known scope.
    #[error("{}: no boundary scope covers this file", file.display())]
    Unplaced {
        /// File path relative to `client/src`.
        file: PathBuf,
    },
    /// At least one rule was broken.
    #[error("client boundary violations:{}", list(.0))]
    Violations(Vec<Violation>),
}

fn list(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("\n- {}: {}", violation.file.display(), violation.message))
        .collect()
}

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: PathBuf,
    /// Rust source text.
    pub contents: String,
}

/// Lint the client crate at `client_dir` and return how many source files
/// were read, composition roots included.
///
/// # Errors
///
/// Returns [`BoundaryError`] when the tree cannot be read, a file cannot be
/// parsed or placed, or any rule is broken.
pub fn lint_client_sources(client_dir: &Path) -> Result<usize, BoundaryError> {
    let sources = read_tree(&client_dir.join("src"))?;
    lint_sources(&sources)?;
    Ok(sources.len())
}

/// Lint in-memory sources.
///
/// # Errors
///
/// Returns [`BoundaryError`] for unparsable or unplaceable files, or with
/// every violation found across all sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), BoundaryError> {
    let mut violations = Vec::new();
    for source in sources {
        let scope = match Scope::place(&source.file) {
            Placement::Scoped(scope) => scope,
            Placement::CompositionRoot => continue,
            Placement::Unknown => {
                return Err(BoundaryError::Unplaced {
                    file: source.file.clone(),
                });
            }
        };
        let parsed = syn::parse_file(&source.contents).map_err(|err| BoundaryError::Parse {
            file: source.file.clone(),
            message: err.to_string(),
        })?;
        violations.extend(check(&source.file, scope, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        violations.sort();
        violations.dedup();
        Err(BoundaryError::Violations(violations))
    }
}

fn check(file: &Path, scope: Scope, parsed: &syn::File) -> Vec<Violation> {
    let violation = |rule, message| Violation {
        file: file.to_path_buf(),
        rule,
        message,
    };
    let mut found = Vec::new();

    let mentions = Mentions::of(parsed);
    for target in mentions.targets() {
        match target {
            Target::Module { name, adapter } => {
                if scope.forbidden_modules().contains(&name) {
                    found.push(violation(
                        Rule::LayerReach,
                        format!("{scope} code must not reach crate::{name}"),
                    ));
                }
                let sibling = adapter.filter(|named| Some(*named) == scope.sibling_adapter());
                if let Some(sibling) = sibling {
                    found.push(violation(
                        Rule::AdapterIsolation,
                        format!(
                            "{scope} must not reach the sibling `{}` adapter",
                            sibling.module()
                        ),
                    ));
                }
            }
            Target::Crate(name) => {
                if scope.forbidden_crates().iter().any(|forbidden| *forbidden == name) {
                    found.push(violation(
                        Rule::CrateReach,
                        format!("{scope} code must not use `{name}`"),
                    ));
                }
            }
        }
    }

    if scope == Scope::Ports {
        found.extend(
            ports::port_shape_problems(parsed)
                .into_iter()
                .map(|message| violation(Rule::PortShape, message)),
        );
    }
    found
}

/// Read every `.rs` file below `src`, sorted by relative path.
fn read_tree(src: &Path) -> Result<Vec<LintSource>, BoundaryError> {
    let mut sources = Vec::new();
    let mut directories = vec![src.to_path_buf()];
    while let Some(directory) = directories.pop() {
        for entry in fs::read_dir(&directory)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                directories.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let file = path.strip_prefix(src).unwrap_or(&path).to_path_buf();
                let contents = fs::read_to_string(&path)?;
                sources.push(LintSource { file, contents });
            }
        }
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}

#[cfg(test)]
mod tests;
