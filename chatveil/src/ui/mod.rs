// chatveil/src/ui/mod.rs
//! Terminal output for the chatveil CLI.
//! License: MIT OR APACHE 2.0

pub mod output_format;
pub mod render;
pub mod theme;
