//! `GameData` documents
//!
//! Features:
//! - Tagged union of schema versions (legacy `elements`, current `objects`)
//! - Explicit migration from any version to a hydrated [`Scene`]
//! - Lossy loading: bad entries are skipped, non-JSON yields an empty scene
//! - Writing always emits the current shape
//!
//! [`Scene`]: crate::scene::Scene

pub mod document;
pub mod migration;

pub use document::{
    CurrentDocument, DocumentError, GameDocument, LegacyDocument, LegacyElement, RawEntity,
    RawRule, SceneDocument,
};
pub use migration::LegacyKinds;
