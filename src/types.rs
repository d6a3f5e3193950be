//! Core types for wisp-ui.
//!
//! The supported host tag set and the crate error type. Everything else
//! builds on these.

use thiserror::Error;

// =============================================================================
// Host Tags
// =============================================================================

/// The fixed set of host tags the runtime knows how to create.
///
/// Unrecognized tag names fall back to [`HostTag::Div`], the generic
/// container. Authoring typos therefore render as plain containers instead
/// of failing the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HostTag {
    /// Generic container. Also the fallback for unknown names and the
    /// wrapper created around component output.
    #[default]
    Div = 0,
    Button = 1,
    H1 = 2,
    P = 3,
    Span = 4,
}

impl HostTag {
    /// Resolve a tag name, falling back to `Div` for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name {
            "div" => Self::Div,
            "button" => Self::Button,
            "h1" => Self::H1,
            "p" => Self::P,
            "span" => Self::Span,
            _ => Self::Div,
        }
    }

    /// The canonical tag name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Button => "button",
            Self::H1 => "h1",
            Self::P => "p",
            Self::Span => "span",
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors reported by the runtime.
///
/// There are no error boundaries: a panic inside a component function
/// propagates out of `render` unrecovered. These variants cover the two
/// hook-protocol violations the engine can detect itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A hook call found its slot recorded with a different tag on a
    /// previous render. Hooks must be called unconditionally, in the same
    /// order, on every render of a component.
    #[error("hook order violation at slot {index}: slot was {recorded} on a previous render, {requested} now")]
    HookOrderViolation {
        /// Slot index the mismatching call landed on.
        index: usize,
        /// Tag recorded in the slot by an earlier render.
        recorded: &'static str,
        /// Tag requested by the current call.
        requested: &'static str,
    },

    /// Hook state was addressed outside a live component instance, e.g. a
    /// state setter invoked after its instance was removed from the tree.
    #[error("hook state addressed outside a live component instance")]
    InvalidHookCall,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known_tags() {
        assert_eq!(HostTag::from_name("div"), HostTag::Div);
        assert_eq!(HostTag::from_name("button"), HostTag::Button);
        assert_eq!(HostTag::from_name("h1"), HostTag::H1);
        assert_eq!(HostTag::from_name("p"), HostTag::P);
        assert_eq!(HostTag::from_name("span"), HostTag::Span);
    }

    #[test]
    fn test_from_name_unknown_falls_back_to_div() {
        assert_eq!(HostTag::from_name("header"), HostTag::Div);
        assert_eq!(HostTag::from_name("buton"), HostTag::Div);
        assert_eq!(HostTag::from_name(""), HostTag::Div);
    }

    #[test]
    fn test_name_round_trip() {
        for tag in [
            HostTag::Div,
            HostTag::Button,
            HostTag::H1,
            HostTag::P,
            HostTag::Span,
        ] {
            assert_eq!(HostTag::from_name(tag.name()), tag);
        }
    }
}
