//! # Storefront Schema
//!
//! The shared vocabulary of the storefront builder: which section and block
//! types exist, what their settings look like, and how a placed layout is
//! persisted.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: registry, settings, layout document │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ editor: composition  │  │ evaluator: rendering │
//! └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! Both consumers depend on this crate only, never on each other, so a
//! layout written by the editor replays identically in the renderer.

pub mod document;
pub mod error;
pub mod id_generator;
pub mod registry;
pub mod settings;
pub mod studio;
pub mod types;
pub mod variants;

pub use document::{LayoutDocument, PlacedBlock, PlacedSection, LAYOUT_KEY};
pub use error::{DocumentError, RegistryError};
pub use id_generator::{tenant_seed, IdGenerator};
pub use registry::{
    BlockTypeDefinition, SchemaRegistry, SchemaRegistryBuilder, SectionCategory,
    SectionTypeDefinition,
};
pub use settings::{merge_settings, read_lenient, to_settings, BlockSettings, DateBound, SectionSettings, Settings};
pub use studio::{StudioConfig, STUDIO_CONFIG_KEY};
pub use variants::{SectionVariant, VariantCatalog};
