//! Translation module - static bilingual message catalog.

mod catalog;

pub use catalog::{bilingual, keys, text};
