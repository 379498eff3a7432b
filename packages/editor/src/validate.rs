//! Schema drift report.
//!
//! A persisted layout outlives the registry it was written against: types
//! get renamed or retired and allowed-block lists shrink. `validate` lists
//! what no longer lines up. It never touches the document; rendering copes
//! with all of these on its own.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use storefront_schema::{LayoutDocument, SchemaRegistry, SectionCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DriftIssue {
    #[serde(rename_all = "camelCase")]
    UnknownSectionType { section_id: String, type_id: String },

    #[serde(rename_all = "camelCase")]
    UnknownBlockType {
        section_id: String,
        block_id: String,
        type_id: String,
    },

    #[serde(rename_all = "camelCase")]
    BlockNotAllowed {
        section_id: String,
        block_id: String,
        section_type: String,
        block_type: String,
    },

    #[serde(rename_all = "camelCase")]
    DuplicateId { id: String },

    /// A header sits after body content, or body content after a footer
    #[serde(rename_all = "camelCase")]
    CategoryOrder { section_id: String, category: SectionCategory },
}

impl fmt::Display for DriftIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriftIssue::UnknownSectionType { section_id, type_id } => {
                write!(f, "section {section_id}: unknown section type '{type_id}'")
            }
            DriftIssue::UnknownBlockType {
                section_id,
                block_id,
                type_id,
            } => write!(f, "section {section_id}, block {block_id}: unknown block type '{type_id}'"),
            DriftIssue::BlockNotAllowed {
                section_id,
                block_id,
                section_type,
                block_type,
            } => write!(
                f,
                "section {section_id}, block {block_id}: '{block_type}' blocks are not allowed in '{section_type}'"
            ),
            DriftIssue::DuplicateId { id } => write!(f, "duplicate id '{id}'"),
            DriftIssue::CategoryOrder { section_id, category } => {
                write!(f, "section {section_id}: {} section out of category order", category.as_str())
            }
        }
    }
}

/// List every way `doc` disagrees with `registry`
pub fn validate(doc: &LayoutDocument, registry: &SchemaRegistry) -> Vec<DriftIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for id in doc.all_ids() {
        if !seen.insert(id) {
            issues.push(DriftIssue::DuplicateId { id: id.to_string() });
        }
    }

    // Rank: header 0, body 1, footer 2; must never decrease.
    let mut highest_rank = 0;

    for section in &doc.sections {
        let Some(definition) = registry.lookup_section(&section.type_id) else {
            issues.push(DriftIssue::UnknownSectionType {
                section_id: section.id.clone(),
                type_id: section.type_id.clone(),
            });
            continue;
        };

        let rank = match definition.category {
            SectionCategory::Header => 0,
            SectionCategory::Body => 1,
            SectionCategory::Footer => 2,
        };
        if rank < highest_rank {
            issues.push(DriftIssue::CategoryOrder {
                section_id: section.id.clone(),
                category: definition.category,
            });
        }
        highest_rank = highest_rank.max(rank);

        for block in &section.blocks {
            if registry.lookup_block(&block.type_id).is_none() {
                issues.push(DriftIssue::UnknownBlockType {
                    section_id: section.id.clone(),
                    block_id: block.id.clone(),
                    type_id: block.type_id.clone(),
                });
            } else if !definition.allows_block(&block.type_id) {
                issues.push(DriftIssue::BlockNotAllowed {
                    section_id: section.id.clone(),
                    block_id: block.id.clone(),
                    section_type: section.type_id.clone(),
                    block_type: block.type_id.clone(),
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> LayoutDocument {
        LayoutDocument::from_json("acme", json).unwrap()
    }

    #[test]
    fn test_clean_document_has_no_issues() {
        let doc = doc(r#"{ "sections": [
            { "id": "s1", "type": "header" },
            { "id": "s2", "type": "hero", "blocks": [ { "id": "b1", "type": "slide" } ] },
            { "id": "s3", "type": "footer" }
        ] }"#);

        assert!(validate(&doc, &SchemaRegistry::builtin()).is_empty());
    }

    #[test]
    fn test_reports_drift() {
        let doc = doc(r#"{ "sections": [
            { "id": "s1", "type": "mega-carousel" },
            { "id": "s2", "type": "hero", "blocks": [
                { "id": "b1", "type": "price" },
                { "id": "b2", "type": "sparkles" },
                { "id": "s1", "type": "text" }
            ] }
        ] }"#);

        let issues = validate(&doc, &SchemaRegistry::builtin());

        assert_eq!(
            issues,
            vec![
                DriftIssue::DuplicateId { id: "s1".to_string() },
                DriftIssue::UnknownSectionType {
                    section_id: "s1".to_string(),
                    type_id: "mega-carousel".to_string()
                },
                DriftIssue::BlockNotAllowed {
                    section_id: "s2".to_string(),
                    block_id: "b1".to_string(),
                    section_type: "hero".to_string(),
                    block_type: "price".to_string()
                },
                DriftIssue::UnknownBlockType {
                    section_id: "s2".to_string(),
                    block_id: "b2".to_string(),
                    type_id: "sparkles".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_category_order() {
        let doc = doc(r#"{ "sections": [
            { "id": "s1", "type": "footer" },
            { "id": "s2", "type": "hero" },
            { "id": "s3", "type": "header" }
        ] }"#);

        let issues = validate(&doc, &SchemaRegistry::builtin());
        assert_eq!(issues.len(), 2);
        assert!(issues[1].to_string().contains("header section out of category order"));
    }
}
