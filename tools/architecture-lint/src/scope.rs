//! Where a file sits in the client and what it may name.

use std::fmt;
use std::path::Path;

/// Crate-root files that wire every layer together and are not linted.
pub(crate) const COMPOSITION_ROOTS: [&str; 2] = ["lib.rs", "main.rs"];

/// Modules directly under the crate root that rules can refer to.
pub(crate) const CRATE_MODULES: [&str; 4] = ["domain", "inbound", "outbound", "settings"];

/// Outbound adapter families. Each must stand alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Adapter {
    Memory,
    Firebase,
}

impl Adapter {
    pub(crate) const fn module(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Firebase => "firebase",
        }
    }

    pub(crate) fn from_module(name: &str) -> Option<Self> {
        match name {
            "memory" => Some(Self::Memory),
            "firebase" => Some(Self::Firebase),
            _ => None,
        }
    }
}

/// Region of `client/src` a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Domain,
    /// `domain/ports`: domain rules plus the port trait shape.
    Ports,
    Inbound,
    /// `None` for files shared by every adapter, such as `outbound/mod.rs`.
    Outbound(Option<Adapter>),
    Settings,
}

/// Result of placing a file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Scoped(Scope),
    CompositionRoot,
    Unknown,
}

impl Scope {
    /// Place `relative`, a path below `client/src`.
    pub(crate) fn place(relative: &Path) -> Placement {
        let names: Vec<&str> = relative
            .components()
            .filter_map(|component| component.as_os_str().to_str())
            .collect();

        let scope = match names.as_slice() {
            [file] if COMPOSITION_ROOTS.contains(file) => return Placement::CompositionRoot,
            ["settings.rs"] => Self::Settings,
            ["domain", "ports", ..] | ["domain", "ports.rs"] => Self::Ports,
            ["domain", ..] | ["domain.rs"] => Self::Domain,
            ["inbound", ..] | ["inbound.rs"] => Self::Inbound,
            ["outbound", adapter, _, ..] => Self::Outbound(Adapter::from_module(adapter)),
            ["outbound", file] => {
                let file: &str = file;
                Self::Outbound(Adapter::from_module(file.strip_suffix(".rs").unwrap_or(file)))
            }
            ["outbound.rs"] => Self::Outbound(None),
            _ => return Placement::Unknown,
        };
        Placement::Scoped(scope)
    }

    /// Crate modules this scope must not name.
    pub(crate) const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain | Self::Ports => &["inbound", "outbound", "settings"],
            Self::Inbound => &["outbound", "settings"],
            Self::Outbound(_) => &["inbound", "settings"],
            Self::Settings => &["inbound"],
        }
    }

    /// Third-party crates this scope must not name.
    pub(crate) const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain | Self::Ports => &[
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
            ],
            Self::Inbound => &["color_eyre", "reqwest", "tracing_subscriber"],
            Self::Outbound(_) => &["clap", "color_eyre", "ortho_config", "tracing_subscriber"],
            Self::Settings => &["clap", "reqwest", "tracing_subscriber"],
        }
    }

    /// The adapter a file in this scope must not reach into.
    pub(crate) const fn sibling_adapter(self) -> Option<Adapter> {
        match self {
            Self::Outbound(Some(Adapter::Memory)) => Some(Adapter::Firebase),
            Self::Outbound(Some(Adapter::Firebase)) => Some(Adapter::Memory),
            _ => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => f.write_str("domain"),
            Self::Ports => f.write_str("port"),
            Self::Inbound => f.write_str("inbound"),
            Self::Outbound(None) => f.write_str("outbound"),
            Self::Outbound(Some(adapter)) => write!(f, "outbound::{}", adapter.module()),
            Self::Settings => f.write_str("settings"),
        }
    }
}
