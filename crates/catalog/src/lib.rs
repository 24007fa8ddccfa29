//! Catalog domain module.
//!
//! Products as the store persists them, plus the transient content shapes the
//! layout generator renders (hero banner, product card). Pure data and
//! validation; no IO, no HTTP, no storage.

pub mod layout;
pub mod product;

pub use layout::{Component, HeroLayout, ProductCard};
pub use product::{Product, ProductDraft, ProductFields};
