//! Built-in section and block type identifiers.

pub const ANNOUNCEMENT_BAR: &str = "announcement-bar";
pub const HEADER: &str = "header";
pub const HERO: &str = "hero";
pub const CATEGORY_GRID: &str = "category-grid";
pub const PRODUCT_GRID: &str = "product-grid";
pub const FLASH_SALE: &str = "flash-sale";
pub const TAGS_PRODUCTS: &str = "tags-products";
pub const BRAND_SHOWCASE: &str = "brand-showcase";
pub const RICH_TEXT: &str = "rich-text";
pub const IMAGE_WITH_TEXT: &str = "image-with-text";
pub const TESTIMONIALS: &str = "testimonials";
pub const NEWSLETTER: &str = "newsletter";
pub const FOOTER: &str = "footer";

pub const BLOCK_HEADING: &str = "heading";
pub const BLOCK_TEXT: &str = "text";
pub const BLOCK_BUTTON: &str = "button";
pub const BLOCK_IMAGE: &str = "image";
pub const BLOCK_SLIDE: &str = "slide";
pub const BLOCK_LINK: &str = "link";
pub const BLOCK_SOCIAL_LINK: &str = "social-link";
pub const BLOCK_TESTIMONIAL: &str = "testimonial";
pub const BLOCK_PRICE: &str = "price";

/// Type id used for the generic fallback definition
pub const FALLBACK: &str = "unknown";
