//! # Storefront Editor
//!
//! Composition engine for storefront layouts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: registry + persisted layout         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: structural edits on a layout        │
//! │  - Category-aware section placement         │
//! │  - Id assignment and default seeding        │
//! │  - Invertible mutations + undo/redo         │
//! │  - Edit session (selection, uploads)        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: layout + store data → VDOM       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is source of truth**: rendered output is a derived view
//! 2. **Total edits**: dangling ids and bad indices are no-ops, not errors
//! 3. **One writer**: the session owns its document; external changes
//!    replace it wholesale
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_editor::EditSession;
//! use storefront_schema::{types, LayoutDocument, SchemaRegistry};
//!
//! let registry = Arc::new(SchemaRegistry::builtin());
//! let mut session = EditSession::new(registry, LayoutDocument::new("acme"));
//!
//! let hero = session.add_section(types::HERO, None)?;
//! session.add_block(hero.created_id().unwrap(), types::BLOCK_SLIDE)?;
//! session.undo()?;
//! ```

mod composer;
mod errors;
mod mutations;
pub mod placement;
mod session;
mod templates;
mod undo_stack;
mod uploads;
mod validate;

pub use composer::{Composer, Direction};
pub use errors::{EditorError, MutationError};
pub use mutations::{Applied, Change, Mutation};
pub use session::{EditSession, Selection};
pub use templates::starter_layout;
pub use undo_stack::{MutationBatch, UndoStack};
pub use uploads::{UploadTarget, UploadTicket};
pub use validate::{validate, DriftIssue};
