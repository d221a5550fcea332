//! Domain entity definitions.

mod cursor;
mod image_key;
mod item;

pub use cursor::{DEFAULT_MAX_START, DEFAULT_PAGE_SIZE, FetchCursor};
pub use image_key::ImageKey;
pub use item::Item;
