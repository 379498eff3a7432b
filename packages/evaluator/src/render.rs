use crate::context::DataContext;
use crate::dispatch::{RenderScope, RenderTable};
use crate::vdom::VNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use storefront_schema::{LayoutDocument, SchemaRegistry};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderKind {
    /// The section's own renderer produced it
    Rendered,
    /// The type could not be resolved; a stand-in was emitted
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
    pub section_id: String,
    pub type_id: String,
    pub kind: RenderKind,
    pub node: VNode,
}

/// Ordered render output for one document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub sections: Vec<RenderedSection>,

    /// Theme tokens from the data context
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub theme: BTreeMap<String, String>,
}

impl RenderedPage {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.section_id.as_str()).collect()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &RenderedSection> {
        self.sections.iter().filter(|s| s.kind == RenderKind::Placeholder)
    }
}

/// Renderer dispatch: resolves each visible section to a render procedure.
///
/// Stateless between calls; the same document and context always produce
/// the same page, and one renderer can serve many tenants concurrently.
pub struct Renderer {
    registry: Arc<SchemaRegistry>,
    table: RenderTable,
}

impl Renderer {
    pub fn new(registry: Arc<SchemaRegistry>, table: RenderTable) -> Self {
        Self { registry, table }
    }

    /// Built-in registry and render table
    pub fn builtin() -> Self {
        Self::new(Arc::new(SchemaRegistry::builtin()), RenderTable::builtin())
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    #[instrument(skip_all, fields(tenant = %document.tenant_id, sections = document.len()))]
    pub fn render(&self, document: &LayoutDocument, ctx: &DataContext) -> RenderedPage {
        let scope = RenderScope::new(ctx);
        let mut sections = Vec::with_capacity(document.len());

        for section in &document.sections {
            if !section.visible {
                continue;
            }

            let renderer = self
                .table
                .get(&section.type_id)
                .filter(|_| self.registry.is_registered(&section.type_id));

            let (kind, node) = match renderer {
                Some(renderer) => match renderer.render(section, &scope) {
                    Some(node) => (RenderKind::Rendered, node),
                    None => {
                        debug!(section_id = %section.id, type_id = %section.type_id, "Section hidden");
                        continue;
                    }
                },
                None => {
                    warn!(section_id = %section.id, type_id = %section.type_id, "Unknown section type, rendering placeholder");
                    match self.table.default_entry().render(section, &scope) {
                        Some(node) => (RenderKind::Placeholder, node),
                        None => continue,
                    }
                }
            };

            sections.push(RenderedSection {
                section_id: section.id.clone(),
                type_id: section.type_id.clone(),
                kind,
                node,
            });
        }

        debug!(rendered = sections.len(), "Render complete");
        RenderedPage {
            sections,
            theme: ctx.theme.clone(),
        }
    }

    /// Render `document`, or `fallback` when the document has no sections
    pub fn render_with_fallback(
        &self,
        document: &LayoutDocument,
        fallback: &LayoutDocument,
        ctx: &DataContext,
    ) -> RenderedPage {
        if document.is_empty() {
            debug!(tenant = %document.tenant_id, "Empty layout, rendering fallback");
            self.render(fallback, ctx)
        } else {
            self.render(document, ctx)
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::builtin()
    }
}
