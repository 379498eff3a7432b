//! # Storefront Evaluator
//!
//! Turns a persisted layout plus a snapshot of store data into a virtual DOM.
//!
//! ## Determinism Contract
//!
//! **INVARIANT: Rendering is fully deterministic.**
//!
//! For any LayoutDocument + DataContext, `render()` MUST produce identical
//! output on every invocation:
//!
//! - Same input → same section list, same VDOM (byte-for-byte when serialized)
//! - Attributes and styles are ordered maps
//! - The clock is part of the DataContext (`now`), never read ambiently
//! - No mutable state survives between renders
//!
//! **Tests**: See `tests/test_determinism.rs` for validation.
//!
//! ## Degradation
//!
//! Rendering never fails. A section whose type is not registered renders as
//! a placeholder carrying its stored name; malformed settings read as their
//! defaults; blocks a renderer does not understand are skipped. Blocks are
//! not re-checked against the section's allowed block types.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_evaluator::{DataContext, Renderer};
//!
//! let renderer = Renderer::builtin();
//! let page = renderer.render(&layout, &DataContext::new(Utc::now()));
//! ```

pub mod context;
pub mod dispatch;
pub mod filters;
pub mod render;
pub mod sections;
pub mod vdom;

pub use context::{Brand, Category, DataContext, Product};
pub use dispatch::{RenderScope, RenderTable, SectionRenderer};
pub use render::{RenderKind, RenderedPage, RenderedSection, Renderer};
pub use vdom::VNode;
