// chatveil-scan/src/lib.rs
//! Low-level text layer shared by the chatveil engine.
//!
//! Everything here works on borrowed input and owned `alloc` buffers so the
//! crate stays usable without `std`: character classification, the
//! offset-tracking normalizer, the separator-collapsed view used by the
//! sliding-window scan, the stylistic Unicode tables and the multi-pattern
//! automaton.
#![no_std]

extern crate alloc; 

#[cfg(feature = "std")]
extern crate std;

pub mod classify;
pub mod normalize;
pub mod collapse;
pub mod styles;
pub mod automaton;

pub use automaton::{BuildError, PatternAutomaton, PatternHit};
pub use collapse::CollapsedText;
pub use normalize::{normalize, NormalizeOptions, NormalizedText};
pub use styles::FancyStyle;

/// Identifier of a pattern inside a [`PatternAutomaton`].
pub type PatternId = u32;
