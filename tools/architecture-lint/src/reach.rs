//! Collects every path a file names and classifies what it reaches.

use std::collections::BTreeSet;

use syn::visit::{self, Visit};

use crate::scope::{Adapter, CRATE_MODULES};

/// Library name of the client, as its binary and tests spell it.
const CLIENT_CRATE: &str = "paddock";

/// What a path points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target<'a> {
    /// A module of the client, with the adapter below `outbound` if named.
    Module {
        name: &'static str,
        adapter: Option<Adapter>,
    },
    /// A third-party crate, by its root segment.
    Crate(&'a str),
}

/// Paths named in a file, each as its identifier segments.
#[derive(Debug, Default)]
pub(crate) struct Mentions {
    paths: BTreeSet<Vec<String>>,
}

impl Mentions {
    pub(crate) fn of(file: &syn::File) -> Self {
        let mut mentions = Self::default();
        mentions.visit_file(file);
        mentions
    }

    pub(crate) fn targets(&self) -> impl Iterator<Item = Target<'_>> {
        self.paths.iter().filter_map(|segments| classify(segments))
    }

    fn flatten_use(&mut self, prefix: &mut Vec<String>, tree: &syn::UseTree) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.flatten_use(prefix, &path.tree);
                prefix.pop();
            }
            syn::UseTree::Name(name) => self.insert_with(prefix, name.ident.to_string()),
            syn::UseTree::Rename(rename) => self.insert_with(prefix, rename.ident.to_string()),
            syn::UseTree::Glob(_) => self.insert_with(prefix, "*".to_owned()),
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.flatten_use(prefix, item);
                }
            }
        }
    }

    fn insert_with(&mut self, prefix: &[String], last: String) {
        let mut segments = prefix.to_vec();
        segments.push(last);
        self.paths.insert(segments);
    }
}

impl<'ast> Visit<'ast> for Mentions {
    fn visit_path(&mut self, path: &'ast syn::Path) {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        visit::visit_path(self, path);
    }

    fn visit_item_use(&mut self, item: &'ast syn::ItemUse) {
        self.flatten_use(&mut Vec::new(), &item.tree);
    }
}

/// Classify one path.
///
/// `crate::`, `paddock::` and bare crate-module prefixes name client modules.
/// A run of `self`/`super` is skipped and whatever follows is matched against
/// the crate modules and adapter names. Anything else is a third-party crate.
pub(crate) fn classify(segments: &[String]) -> Option<Target<'_>> {
    let (first, rest) = segments.split_first()?;
    match first.as_str() {
        "crate" | CLIENT_CRATE => module_target(rest),
        "self" | "super" => {
            let skipped = segments
                .iter()
                .position(|segment| !matches!(segment.as_str(), "self" | "super"))?;
            let tail = segments.get(skipped..)?;
            module_target(tail).or_else(|| {
                let adapter = Adapter::from_module(tail.first()?)?;
                Some(Target::Module {
                    name: "outbound",
                    adapter: Some(adapter),
                })
            })
        }
        "Self" => None,
        name if CRATE_MODULES.contains(&name) => module_target(segments),
        name => Some(Target::Crate(name)),
    }
}

fn module_target(segments: &[String]) -> Option<Target<'_>> {
    let (first, rest) = segments.split_first()?;
    let name = CRATE_MODULES
        .iter()
        .copied()
        .find(|module| *module == first.as_str())?;
    let adapter = if name == "outbound" {
        rest.first().and_then(|next| Adapter::from_module(next))
    } else {
        None
    };
    Some(Target::Module { name, adapter })
}
