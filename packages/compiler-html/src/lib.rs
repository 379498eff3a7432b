//! Server-side HTML output for rendered storefront pages.
//!
//! Consumes the virtual DOM produced by `storefront-evaluator` and writes a
//! complete HTML document. Text and attribute values are escaped; theme
//! tokens become CSS custom properties on `:root`.

mod compiler;

pub use compiler::{compile_fragment, compile_to_html, css_variable_name, CompileError, CompileOptions};

#[cfg(test)]
mod tests;
