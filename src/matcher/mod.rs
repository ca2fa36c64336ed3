//! Case-number matching and match navigation
//!
//! - [`pattern`]: literal, case-insensitive matchers
//! - [`scan`]: pure computation of the match set from scanned rows
//! - [`navigator`]: cursor, highlighting and keyboard handling over a [`PageSurface`](crate::surface::PageSurface)
//! - [`overlay`]: floating next/previous/counter UI state
//! - [`style`]: highlight colors

pub mod navigator;
pub mod overlay;
pub mod pattern;
pub mod scan;
pub mod style;

pub use navigator::{Direction, KeyOutcome, MatchStatus, Navigator};
pub use overlay::{OverlayView, counter_text};
pub use pattern::CasePattern;
pub use scan::{MatchEntry, MatchSet, compute_matches};
pub use style::{HighlightStyle, RowState};
