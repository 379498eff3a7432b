pub mod init;
pub mod new;
pub mod render;
pub mod sections;
pub mod validate;
pub mod variants;

pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use render::{render, RenderArgs};
pub use sections::{sections, SectionsArgs};
pub use validate::{validate, ValidateArgs};
pub use variants::{variants, VariantsArgs};
