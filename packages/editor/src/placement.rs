//! # Category-boundary placement
//!
//! Where a newly added section lands:
//!
//! - **header**: immediately before the first non-header item
//! - **footer**: at the very end
//! - **body**: immediately before the first footer item (or at the end)
//!
//! Starting from a list that already satisfies "headers first, footers last",
//! repeated insertions keep headers contiguous at the head and footers at the
//! tail, each group in insertion order.

use storefront_schema::SectionCategory;

/// Index at which an item of `category` should be inserted into `items`
pub fn insertion_index<T>(
    items: &[T],
    category: SectionCategory,
    is_header: impl Fn(&T) -> bool,
    is_footer: impl Fn(&T) -> bool,
) -> usize {
    match category {
        SectionCategory::Header => items
            .iter()
            .position(|item| !is_header(item))
            .unwrap_or(items.len()),
        SectionCategory::Footer => items.len(),
        SectionCategory::Body => items
            .iter()
            .position(|item| is_footer(item))
            .unwrap_or(items.len()),
    }
}

/// Move one element from `from` to `to`, shifting the others.
///
/// Returns false (and leaves `items` untouched) when either index is out of
/// range or the indices are equal.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() || from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use SectionCategory::*;

    fn index(items: &[SectionCategory], category: SectionCategory) -> usize {
        insertion_index(items, category, |c| *c == Header, |c| *c == Footer)
    }

    #[test]
    fn test_header_goes_after_existing_headers() {
        assert_eq!(index(&[Header, Body, Footer], Header), 1);
        assert_eq!(index(&[Header, Header], Header), 2);
        assert_eq!(index(&[Body, Footer], Header), 0);
        assert_eq!(index(&[], Header), 0);
    }

    #[test]
    fn test_body_goes_before_first_footer() {
        assert_eq!(index(&[Header, Body, Footer], Body), 2);
        assert_eq!(index(&[Header, Footer, Footer], Body), 1);
        assert_eq!(index(&[Header, Body], Body), 2);
    }

    #[test]
    fn test_footer_appends() {
        assert_eq!(index(&[Header, Body, Footer], Footer), 3);
        assert_eq!(index(&[], Footer), 0);
    }

    #[test]
    fn test_move_item_is_array_move_not_swap() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        assert!(move_item(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_move_item_out_of_range_is_noop() {
        let mut items = vec![1, 2, 3];
        assert!(!move_item(&mut items, 3, 0));
        assert!(!move_item(&mut items, 0, 3));
        assert!(!move_item(&mut items, 1, 1));
        assert_eq!(items, vec![1, 2, 3]);
    }
}
