//! Entry-by-entry extraction: containment, object creation, metadata.

pub mod engine;
pub mod metadata;

pub use engine::Extractor;
pub use metadata::PERMISSION_BITS;
pub use metadata::apply_metadata;
