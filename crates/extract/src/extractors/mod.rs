// ABOUTME: The two block extractors: whole-tree recursive mode and
// ABOUTME: heading-delimited section mode.

pub mod sections;
pub mod tree;

pub use sections::{extract_hero, extract_sections};
pub use tree::extract_blocks;
