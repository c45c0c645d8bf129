//! Error types raised by drawables.
//!
//! Loading failures travel as `anyhow::Error` across async boundaries; the
//! typed [`DrawableError`] sits underneath so callers can downcast when they
//! need to tell a missing asset apart from caller misuse.

use std::fmt;

/// Which collaborator resource a load was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Mesh,
    Program,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Mesh => f.write_str("mesh"),
            ResourceKind::Program => f.write_str("program"),
        }
    }
}

#[derive(Debug)]
pub enum DrawableError {
    /// A named mesh or program could not be resolved by the asset provider.
    ResourceLoad {
        kind: ResourceKind,
        name: String,
        source: anyhow::Error,
    },
    /// A raw draw mode outside of {triangles, lines}.
    InvalidDrawMode(u32),
    /// A draw mode name outside of {triangles, lines}.
    UnknownDrawMode(String),
}

impl fmt::Display for DrawableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawableError::ResourceLoad { kind, name, source } => {
                write!(f, "failed to load {} '{}': {}", kind, name, source)
            }
            DrawableError::InvalidDrawMode(raw) => {
                write!(f, "invalid draw mode {:#06x}, expected TRIANGLES or LINES", raw)
            }
            DrawableError::UnknownDrawMode(name) => {
                write!(f, "unknown draw mode '{}', expected 'triangles' or 'lines'", name)
            }
        }
    }
}

impl std::error::Error for DrawableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawableError::ResourceLoad { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
