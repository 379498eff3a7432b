//! # Section/Block Type Registry
//!
//! Constructed-once catalog of every section and block type the editor can
//! place and the renderer can draw. Lookups are pure and never fail hard:
//! call sites that must always produce something use
//! [`SchemaRegistry::section_or_fallback`].
//!
//! The registry is passed explicitly (usually behind an `Arc`) to the
//! composer and the renderer, so tests can build a reduced one with
//! [`SchemaRegistry::builder`].

use crate::error::RegistryError;
use crate::settings::*;
use crate::types;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placement category of a section type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionCategory {
    Header,
    Body,
    Footer,
}

impl SectionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionCategory::Header => "header",
            SectionCategory::Body => "body",
            SectionCategory::Footer => "footer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "header" => Some(SectionCategory::Header),
            "body" => Some(SectionCategory::Body),
            "footer" => Some(SectionCategory::Footer),
            _ => None,
        }
    }
}

/// Registry entry for a section type
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTypeDefinition {
    pub type_id: String,
    pub label: String,
    pub description: String,
    pub icon: String,
    pub category: SectionCategory,
    pub allowed_block_types: Vec<String>,
    pub default_settings: Settings,
}

impl SectionTypeDefinition {
    pub fn new(type_id: impl Into<String>, label: impl Into<String>, category: SectionCategory) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            description: String::new(),
            icon: String::new(),
            category,
            allowed_block_types: Vec::new(),
            default_settings: Settings::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn allow_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for block in blocks {
            let block = block.into();
            if !self.allowed_block_types.contains(&block) {
                self.allowed_block_types.push(block);
            }
        }
        self
    }

    pub fn with_defaults(mut self, defaults: Settings) -> Self {
        self.default_settings = defaults;
        self
    }

    /// Seed defaults from a typed settings record
    pub fn with_typed_defaults<T: Serialize + Default>(self) -> Self {
        self.with_defaults(to_settings(&T::default()))
    }

    pub fn allows_block(&self, block_type: &str) -> bool {
        self.allowed_block_types.iter().any(|b| b == block_type)
    }
}

/// Registry entry for a block type
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTypeDefinition {
    pub type_id: String,
    pub label: String,
    pub icon: String,
    pub default_settings: Settings,
}

impl BlockTypeDefinition {
    pub fn new(type_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            icon: String::new(),
            default_settings: Settings::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_defaults(mut self, defaults: Settings) -> Self {
        self.default_settings = defaults;
        self
    }

    pub fn with_typed_defaults<T: Serialize + Default>(self) -> Self {
        self.with_defaults(to_settings(&T::default()))
    }
}

/// Immutable section/block catalog
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    sections: Vec<SectionTypeDefinition>,
    section_index: HashMap<String, usize>,
    blocks: Vec<BlockTypeDefinition>,
    block_index: HashMap<String, usize>,
    fallback: SectionTypeDefinition,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn lookup_section(&self, type_id: &str) -> Option<&SectionTypeDefinition> {
        self.section_index.get(type_id).map(|&i| &self.sections[i])
    }

    pub fn lookup_block(&self, type_id: &str) -> Option<&BlockTypeDefinition> {
        self.block_index.get(type_id).map(|&i| &self.blocks[i])
    }

    /// Resolve a section type, degrading to the generic definition
    pub fn section_or_fallback(&self, type_id: &str) -> &SectionTypeDefinition {
        self.lookup_section(type_id).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &SectionTypeDefinition {
        &self.fallback
    }

    /// Section types of one category, in registration order
    pub fn list_by_category(&self, category: SectionCategory) -> Vec<&SectionTypeDefinition> {
        self.sections
            .iter()
            .filter(|def| def.category == category)
            .collect()
    }

    pub fn sections(&self) -> &[SectionTypeDefinition] {
        &self.sections
    }

    pub fn blocks(&self) -> &[BlockTypeDefinition] {
        &self.blocks
    }

    /// Category of a type id; unknown types count as body
    pub fn category_of(&self, type_id: &str) -> SectionCategory {
        self.section_or_fallback(type_id).category
    }

    pub fn is_registered(&self, type_id: &str) -> bool {
        self.section_index.contains_key(type_id)
    }

    /// The built-in storefront catalog
    pub fn builtin() -> Self {
        use SectionCategory::*;

        let blocks = [
            BlockTypeDefinition::new(types::BLOCK_HEADING, "Heading")
                .with_icon("heading")
                .with_typed_defaults::<HeadingBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_TEXT, "Text")
                .with_icon("text")
                .with_typed_defaults::<TextBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_BUTTON, "Button")
                .with_icon("mouse-pointer")
                .with_typed_defaults::<ButtonBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_IMAGE, "Image")
                .with_icon("image")
                .with_typed_defaults::<ImageBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_SLIDE, "Slide")
                .with_icon("gallery-horizontal")
                .with_typed_defaults::<SlideBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_LINK, "Link")
                .with_icon("link")
                .with_typed_defaults::<LinkBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_SOCIAL_LINK, "Social link")
                .with_icon("share")
                .with_typed_defaults::<SocialLinkBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_TESTIMONIAL, "Testimonial")
                .with_icon("quote")
                .with_typed_defaults::<TestimonialBlockSettings>(),
            BlockTypeDefinition::new(types::BLOCK_PRICE, "Price")
                .with_icon("tag")
                .with_typed_defaults::<PriceBlockSettings>(),
        ];

        let sections = [
            SectionTypeDefinition::new(types::ANNOUNCEMENT_BAR, "Announcement bar", Header)
                .with_icon("megaphone")
                .with_description("A thin promotional strip above the header")
                .allow_blocks([types::BLOCK_TEXT, types::BLOCK_LINK])
                .with_typed_defaults::<AnnouncementBarSettings>(),
            SectionTypeDefinition::new(types::HEADER, "Header", Header)
                .with_icon("panel-top")
                .with_description("Logo, navigation, search and cart")
                .allow_blocks([types::BLOCK_LINK])
                .with_typed_defaults::<HeaderSettings>(),
            SectionTypeDefinition::new(types::HERO, "Hero banner", Body)
                .with_icon("image")
                .with_description("Large banner with heading and call to action")
                .allow_blocks([
                    types::BLOCK_HEADING,
                    types::BLOCK_TEXT,
                    types::BLOCK_BUTTON,
                    types::BLOCK_IMAGE,
                    types::BLOCK_SLIDE,
                ])
                .with_typed_defaults::<HeroSettings>(),
            SectionTypeDefinition::new(types::CATEGORY_GRID, "Category grid", Body)
                .with_icon("layout-grid")
                .with_description("Tiles linking to product categories")
                .with_typed_defaults::<CategoryGridSettings>(),
            SectionTypeDefinition::new(types::PRODUCT_GRID, "Product grid", Body)
                .with_icon("shopping-bag")
                .with_description("A filtered grid of products")
                .allow_blocks([types::BLOCK_HEADING, types::BLOCK_PRICE])
                .with_typed_defaults::<ProductGridSettings>(),
            SectionTypeDefinition::new(types::FLASH_SALE, "Flash sale", Body)
                .with_icon("zap")
                .with_description("Time-limited sale products with a countdown")
                .allow_blocks([types::BLOCK_HEADING, types::BLOCK_TEXT, types::BLOCK_PRICE])
                .with_typed_defaults::<FlashSaleSettings>(),
            SectionTypeDefinition::new(types::TAGS_PRODUCTS, "Tagged products", Body)
                .with_icon("tags")
                .with_description("Products carrying a specific tag")
                .allow_blocks([types::BLOCK_HEADING])
                .with_typed_defaults::<TagsProductsSettings>(),
            SectionTypeDefinition::new(types::BRAND_SHOWCASE, "Brand showcase", Body)
                .with_icon("award")
                .with_description("Logos of the brands you carry")
                .allow_blocks([types::BLOCK_IMAGE])
                .with_typed_defaults::<BrandShowcaseSettings>(),
            SectionTypeDefinition::new(types::RICH_TEXT, "Rich text", Body)
                .with_icon("align-left")
                .with_description("Heading and paragraphs of free text")
                .allow_blocks([types::BLOCK_HEADING, types::BLOCK_TEXT, types::BLOCK_BUTTON])
                .with_typed_defaults::<RichTextSettings>(),
            SectionTypeDefinition::new(types::IMAGE_WITH_TEXT, "Image with text", Body)
                .with_icon("layout-panel-left")
                .with_description("An image beside a block of text")
                .allow_blocks([
                    types::BLOCK_HEADING,
                    types::BLOCK_TEXT,
                    types::BLOCK_BUTTON,
                    types::BLOCK_IMAGE,
                ])
                .with_typed_defaults::<ImageWithTextSettings>(),
            SectionTypeDefinition::new(types::TESTIMONIALS, "Testimonials", Body)
                .with_icon("message-square-quote")
                .with_description("Customer quotes and ratings")
                .allow_blocks([types::BLOCK_TESTIMONIAL])
                .with_typed_defaults::<TestimonialsSettings>(),
            SectionTypeDefinition::new(types::NEWSLETTER, "Newsletter", Body)
                .with_icon("mail")
                .with_description("Email signup form")
                .allow_blocks([types::BLOCK_HEADING, types::BLOCK_TEXT])
                .with_typed_defaults::<NewsletterSettings>(),
            SectionTypeDefinition::new(types::FOOTER, "Footer", Footer)
                .with_icon("panel-bottom")
                .with_description("Links, social profiles and copyright")
                .allow_blocks([types::BLOCK_LINK, types::BLOCK_SOCIAL_LINK, types::BLOCK_TEXT])
                .with_typed_defaults::<FooterSettings>(),
        ];

        let mut builder = Self::builder();
        for block in blocks {
            builder = builder.block(block);
        }
        for section in sections {
            builder = builder.section(section);
        }

        // Static table, covered by test_builtin_registry_builds
        match builder.build() {
            Ok(registry) => registry,
            Err(e) => panic!("built-in registry is inconsistent: {}", e),
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Validating builder for [`SchemaRegistry`]
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    sections: Vec<SectionTypeDefinition>,
    blocks: Vec<BlockTypeDefinition>,
}

impl SchemaRegistryBuilder {
    pub fn section(mut self, definition: SectionTypeDefinition) -> Self {
        self.sections.push(definition);
        self
    }

    pub fn block(mut self, definition: BlockTypeDefinition) -> Self {
        self.blocks.push(definition);
        self
    }

    pub fn build(self) -> Result<SchemaRegistry, RegistryError> {
        let mut block_index = HashMap::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if block_index.insert(block.type_id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateBlockType(block.type_id.clone()));
            }
        }

        let mut section_index = HashMap::new();
        for (i, section) in self.sections.iter().enumerate() {
            if section_index.insert(section.type_id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateSectionType(section.type_id.clone()));
            }
            for block in &section.allowed_block_types {
                if !block_index.contains_key(block) {
                    return Err(RegistryError::UnknownAllowedBlock {
                        section: section.type_id.clone(),
                        block: block.clone(),
                    });
                }
            }
        }

        let fallback = SectionTypeDefinition::new(types::FALLBACK, "Unknown section", SectionCategory::Body)
            .with_icon("help-circle")
            .with_description("Placeholder for a section type this version does not know");

        Ok(SchemaRegistry {
            sections: self.sections,
            section_index,
            blocks: self.blocks,
            block_index,
            fallback,
        })
    }
}
