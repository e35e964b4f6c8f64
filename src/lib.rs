//! Placeholder icon generation: solid squares with a centered text label.

pub mod font;
pub mod icon_gen;
