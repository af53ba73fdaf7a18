//! Value objects - immutable types that represent domain concepts

mod slug;

pub use slug::{slugify, SlugAllocator};
