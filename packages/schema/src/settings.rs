//! # Typed Settings
//!
//! Settings are persisted as a plain JSON object so that layouts written by
//! newer editors (or hand-edited ones) survive a round-trip through older code.
//! Consumers never poke at the raw map directly; they read it through the
//! typed view for the owning section or block type.
//!
//! ## Reading rules
//!
//! - Missing key → the field's default
//! - Unknown key → ignored by the typed view, retained in the stored map
//! - Malformed value (wrong JSON shape) → dropped, default used, other keys kept

use crate::types;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserializer, Serializer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Raw persisted settings map
pub type Settings = serde_json::Map<String, Value>;

/// Serialize a typed record into a settings map
pub fn to_settings<T: Serialize>(value: &T) -> Settings {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Settings::new(),
    }
}

/// Overlay `overrides` on top of `base` (shallow, key by key)
pub fn merge_settings(base: &Settings, overrides: Option<&Settings>) -> Settings {
    let mut merged = base.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Read a typed record out of a settings map, tolerating drift.
pub fn read_lenient<T>(settings: &Settings) -> T
where
    T: DeserializeOwned + Serialize + Default,
{
    if let Ok(value) = serde_json::from_value::<T>(Value::Object(settings.clone())) {
        return value;
    }

    // Slow path: accept keys one at a time on top of the defaults.
    let mut accepted = to_settings(&T::default());
    for (key, value) in settings {
        let mut candidate = accepted.clone();
        candidate.insert(key.clone(), value.clone());
        if serde_json::from_value::<T>(Value::Object(candidate.clone())).is_ok() {
            accepted = candidate;
        } else {
            warn!(key = %key, "Dropping malformed setting value");
        }
    }

    serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Candidate filter for product grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductFilter {
    #[default]
    All,
    Featured,
    Bestseller,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeroHeight {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

impl HeroHeight {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeroHeight::Small => "small",
            HeroHeight::Medium => "medium",
            HeroHeight::Large => "large",
            HeroHeight::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
}

impl ButtonStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonStyle::Primary => "primary",
            ButtonStyle::Secondary => "secondary",
            ButtonStyle::Outline => "outline",
        }
    }
}

// ---------------------------------------------------------------------------
// Section settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnouncementBarSettings {
    pub text: String,
    pub link: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for AnnouncementBarSettings {
    fn default() -> Self {
        Self {
            text: "Free shipping on orders over $50".to_string(),
            link: String::new(),
            background_color: "#111827".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderSettings {
    pub store_name: String,
    pub logo_url: String,
    pub show_search: bool,
    pub show_cart: bool,
    pub show_categories: bool,
    pub sticky: bool,
    pub menu_alignment: Alignment,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            store_name: "My Store".to_string(),
            logo_url: String::new(),
            show_search: true,
            show_cart: true,
            show_categories: true,
            sticky: true,
            menu_alignment: Alignment::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSettings {
    pub heading: String,
    pub subheading: String,
    pub background_image: String,
    pub button_label: String,
    pub button_url: String,
    pub height: HeroHeight,
    pub text_alignment: Alignment,
    pub overlay_opacity: u8,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            heading: "Welcome to our store".to_string(),
            subheading: "Discover products you'll love".to_string(),
            background_image: String::new(),
            button_label: "Shop now".to_string(),
            button_url: "/products".to_string(),
            height: HeroHeight::Medium,
            text_alignment: Alignment::Center,
            overlay_opacity: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryGridSettings {
    pub title: String,
    pub columns: u8,
    pub categories_to_show: usize,
    pub show_product_count: bool,
}

impl Default for CategoryGridSettings {
    fn default() -> Self {
        Self {
            title: "Shop by category".to_string(),
            columns: 4,
            categories_to_show: 8,
            show_product_count: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductGridSettings {
    pub title: String,
    pub filter_type: ProductFilter,
    pub products_to_show: usize,
    pub columns: u8,
    pub category_id: Option<String>,
    pub show_price: bool,
    pub show_add_to_cart: bool,
}

impl Default for ProductGridSettings {
    fn default() -> Self {
        Self {
            title: "Featured products".to_string(),
            filter_type: ProductFilter::All,
            products_to_show: 8,
            columns: 4,
            category_id: None,
            show_price: true,
            show_add_to_cart: true,
        }
    }
}

/// One end of a date window as merchants enter it.
///
/// Accepts RFC 3339, a date-time without offset (read as UTC, the form an
/// HTML `datetime-local` input produces) and a bare date. Anything else is
/// kept as `Invalid` so the window can be treated as closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DateBound {
    #[default]
    Open,
    At(DateTime<Utc>),
    Day(NaiveDate),
    Invalid(String),
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

impl DateBound {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return DateBound::Open;
        }
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return DateBound::At(at.with_timezone(&Utc));
        }
        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
                return DateBound::At(at.and_utc());
            }
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(day) => DateBound::Day(day),
            Err(_) => DateBound::Invalid(raw.to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DateBound::Open)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DateBound::Invalid(_))
    }

    /// Instant this bound opens a window at; a bare date starts at midnight
    pub fn as_start(&self) -> Option<DateTime<Utc>> {
        match self {
            DateBound::At(at) => Some(*at),
            DateBound::Day(day) => day.and_hms_opt(0, 0, 0).map(|at| at.and_utc()),
            DateBound::Open | DateBound::Invalid(_) => None,
        }
    }

    /// Instant this bound closes a window at; a bare date covers the whole day
    pub fn as_end(&self) -> Option<DateTime<Utc>> {
        match self {
            DateBound::At(at) => Some(*at),
            DateBound::Day(day) => day
                .and_hms_nano_opt(23, 59, 59, 999_999_999)
                .map(|at| at.and_utc()),
            DateBound::Open | DateBound::Invalid(_) => None,
        }
    }
}

impl Serialize for DateBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateBound::Open => serializer.serialize_none(),
            DateBound::At(at) => serializer.serialize_str(&at.to_rfc3339()),
            DateBound::Day(day) => serializer.serialize_str(&day.format("%Y-%m-%d").to_string()),
            DateBound::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for DateBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => DateBound::Open,
            Value::String(raw) => DateBound::parse(&raw),
            other => DateBound::Invalid(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlashSaleSettings {
    pub title: String,
    pub subtitle: String,
    pub start_date: DateBound,
    pub end_date: DateBound,
    pub products_to_show: usize,
    /// Tag that marks a product as on sale when the explicit flag is unset
    pub sale_tag: String,
    pub show_countdown: bool,
}

impl Default for FlashSaleSettings {
    fn default() -> Self {
        Self {
            title: "Flash sale".to_string(),
            subtitle: "Limited time offers".to_string(),
            start_date: DateBound::Open,
            end_date: DateBound::Open,
            products_to_show: 8,
            sale_tag: "sale".to_string(),
            show_countdown: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagsProductsSettings {
    pub title: String,
    pub tag_name: String,
    pub products_to_show: usize,
}

impl Default for TagsProductsSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            tag_name: String::new(),
            products_to_show: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandShowcaseSettings {
    pub title: String,
    pub brands_to_show: usize,
    pub grayscale: bool,
}

impl Default for BrandShowcaseSettings {
    fn default() -> Self {
        Self {
            title: "Our brands".to_string(),
            brands_to_show: 12,
            grayscale: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RichTextSettings {
    pub heading: String,
    pub content: String,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageWithTextSettings {
    pub image: String,
    pub heading: String,
    pub text: String,
    pub image_position: ImagePosition,
    pub button_label: String,
    pub button_url: String,
}

impl Default for ImageWithTextSettings {
    fn default() -> Self {
        Self {
            image: String::new(),
            heading: "Image with text".to_string(),
            text: "Pair an image with text to tell your story.".to_string(),
            image_position: ImagePosition::Left,
            button_label: String::new(),
            button_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialsSettings {
    pub title: String,
    pub columns: u8,
}

impl Default for TestimonialsSettings {
    fn default() -> Self {
        Self {
            title: "What our customers say".to_string(),
            columns: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsletterSettings {
    pub heading: String,
    pub subheading: String,
    pub placeholder: String,
    pub button_label: String,
}

impl Default for NewsletterSettings {
    fn default() -> Self {
        Self {
            heading: "Subscribe to our newsletter".to_string(),
            subheading: "Get the latest deals straight to your inbox".to_string(),
            placeholder: "Enter your email".to_string(),
            button_label: "Subscribe".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterSettings {
    pub store_name: String,
    pub copyright_text: String,
    pub show_categories: bool,
    pub show_social_links: bool,
    pub show_payment_icons: bool,
    pub background_color: String,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            store_name: "My Store".to_string(),
            copyright_text: "All rights reserved.".to_string(),
            show_categories: true,
            show_social_links: true,
            show_payment_icons: true,
            background_color: "#111827".to_string(),
        }
    }
}

/// Typed view of a section's settings, keyed by section type
#[derive(Debug, Clone, PartialEq)]
pub enum SectionSettings {
    AnnouncementBar(AnnouncementBarSettings),
    Header(HeaderSettings),
    Hero(HeroSettings),
    CategoryGrid(CategoryGridSettings),
    ProductGrid(ProductGridSettings),
    FlashSale(FlashSaleSettings),
    TagsProducts(TagsProductsSettings),
    BrandShowcase(BrandShowcaseSettings),
    RichText(RichTextSettings),
    ImageWithText(ImageWithTextSettings),
    Testimonials(TestimonialsSettings),
    Newsletter(NewsletterSettings),
    Footer(FooterSettings),
    /// Unknown or custom section type, kept as-is
    Custom(Settings),
}

impl SectionSettings {
    pub fn read(type_id: &str, settings: &Settings) -> Self {
        match type_id {
            types::ANNOUNCEMENT_BAR => Self::AnnouncementBar(read_lenient(settings)),
            types::HEADER => Self::Header(read_lenient(settings)),
            types::HERO => Self::Hero(read_lenient(settings)),
            types::CATEGORY_GRID => Self::CategoryGrid(read_lenient(settings)),
            types::PRODUCT_GRID => Self::ProductGrid(read_lenient(settings)),
            types::FLASH_SALE => Self::FlashSale(read_lenient(settings)),
            types::TAGS_PRODUCTS => Self::TagsProducts(read_lenient(settings)),
            types::BRAND_SHOWCASE => Self::BrandShowcase(read_lenient(settings)),
            types::RICH_TEXT => Self::RichText(read_lenient(settings)),
            types::IMAGE_WITH_TEXT => Self::ImageWithText(read_lenient(settings)),
            types::TESTIMONIALS => Self::Testimonials(read_lenient(settings)),
            types::NEWSLETTER => Self::Newsletter(read_lenient(settings)),
            types::FOOTER => Self::Footer(read_lenient(settings)),
            _ => Self::Custom(settings.clone()),
        }
    }

    /// Convert back into a persisted settings map
    pub fn to_settings(&self) -> Settings {
        match self {
            Self::AnnouncementBar(s) => to_settings(s),
            Self::Header(s) => to_settings(s),
            Self::Hero(s) => to_settings(s),
            Self::CategoryGrid(s) => to_settings(s),
            Self::ProductGrid(s) => to_settings(s),
            Self::FlashSale(s) => to_settings(s),
            Self::TagsProducts(s) => to_settings(s),
            Self::BrandShowcase(s) => to_settings(s),
            Self::RichText(s) => to_settings(s),
            Self::ImageWithText(s) => to_settings(s),
            Self::Testimonials(s) => to_settings(s),
            Self::Newsletter(s) => to_settings(s),
            Self::Footer(s) => to_settings(s),
            Self::Custom(map) => map.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Block settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingBlockSettings {
    pub text: String,
    pub level: u8,
}

impl Default for HeadingBlockSettings {
    fn default() -> Self {
        Self {
            text: "Heading".to_string(),
            level: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TextBlockSettings {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonBlockSettings {
    pub label: String,
    pub url: String,
    pub style: ButtonStyle,
}

impl Default for ButtonBlockSettings {
    fn default() -> Self {
        Self {
            label: "Shop now".to_string(),
            url: "/products".to_string(),
            style: ButtonStyle::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageBlockSettings {
    pub src: String,
    pub alt: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideBlockSettings {
    pub image: String,
    pub heading: String,
    pub subheading: String,
    pub button_label: String,
    pub button_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkBlockSettings {
    pub label: String,
    pub url: String,
}

impl Default for LinkBlockSettings {
    fn default() -> Self {
        Self {
            label: "Link".to_string(),
            url: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinkBlockSettings {
    pub platform: String,
    pub url: String,
}

impl Default for SocialLinkBlockSettings {
    fn default() -> Self {
        Self {
            platform: "facebook".to_string(),
            url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialBlockSettings {
    pub author: String,
    pub quote: String,
    pub rating: u8,
}

impl Default for TestimonialBlockSettings {
    fn default() -> Self {
        Self {
            author: String::new(),
            quote: String::new(),
            rating: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceBlockSettings {
    pub show_compare_at: bool,
}

impl Default for PriceBlockSettings {
    fn default() -> Self {
        Self {
            show_compare_at: true,
        }
    }
}

/// Typed view of a block's settings, keyed by block type
#[derive(Debug, Clone, PartialEq)]
pub enum BlockSettings {
    Heading(HeadingBlockSettings),
    Text(TextBlockSettings),
    Button(ButtonBlockSettings),
    Image(ImageBlockSettings),
    Slide(SlideBlockSettings),
    Link(LinkBlockSettings),
    SocialLink(SocialLinkBlockSettings),
    Testimonial(TestimonialBlockSettings),
    Price(PriceBlockSettings),
    Custom(Settings),
}

impl BlockSettings {
    pub fn read(type_id: &str, settings: &Settings) -> Self {
        match type_id {
            types::BLOCK_HEADING => Self::Heading(read_lenient(settings)),
            types::BLOCK_TEXT => Self::Text(read_lenient(settings)),
            types::BLOCK_BUTTON => Self::Button(read_lenient(settings)),
            types::BLOCK_IMAGE => Self::Image(read_lenient(settings)),
            types::BLOCK_SLIDE => Self::Slide(read_lenient(settings)),
            types::BLOCK_LINK => Self::Link(read_lenient(settings)),
            types::BLOCK_SOCIAL_LINK => Self::SocialLink(read_lenient(settings)),
            types::BLOCK_TESTIMONIAL => Self::Testimonial(read_lenient(settings)),
            types::BLOCK_PRICE => Self::Price(read_lenient(settings)),
            _ => Self::Custom(settings.clone()),
        }
    }
}
