//! Foundation types for the mockforge toolchain.
//!
//! This module provides fundamental types used throughout the resolver:
//! - [`FileId`] - Interned file identifiers
//! - [`TextRange`], [`TextSize`] - Declaration source positions
//! - [`split_top_level`] - Bracket-aware splitting of type text
//!
//! This module has NO dependencies on other mockforge modules.

mod file_id;
mod text;

pub use file_id::FileId;
pub use text::{contains_top_level, split_top_level};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};

/// Build a range from a byte offset and a length.
#[inline]
pub fn range_at(offset: u32, len: u32) -> TextRange {
    TextRange::at(TextSize::from(offset), TextSize::from(len))
}
