//! Reusable single-line UI components.

pub mod status_bar;
pub mod symbol_bar;
