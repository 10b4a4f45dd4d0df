//! Slug generation for term and heading anchors.
//!
//! Slugs are lowercase, with non-alphanumeric runs collapsed to a single
//! hyphen, matching the anchor format `#term-<slug>` markers link to.

use std::collections::HashSet;

/// Generate a slug from text.
///
/// Converts text to lowercase, replaces whitespace and special characters
/// with hyphens, and removes consecutive/leading/trailing hyphens.
///
/// # Examples
///
/// ```
/// use glossator::slug::slugify;
///
/// assert_eq!(slugify("General-Purpose AI Model"), "general-purpose-ai-model");
/// assert_eq!(slugify("Provider"), "provider");
/// assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
/// ```
pub fn slugify(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                // Skip other characters
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Allocates document-unique ids from slugs.
///
/// The first use of a slug gets the slug itself; collisions append `-2`,
/// `-3`, ... in allocation order. Existing document ids can be reserved up
/// front so stamped ids never collide with them.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    used: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id that already exists in the document.
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    /// Allocate a unique id for the given text.
    pub fn allocate(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };

        let mut unique = base.clone();
        let mut counter = 1;
        while self.used.contains(&unique) {
            counter += 1;
            unique = format!("{base}-{counter}");
        }
        self.used.insert(unique.clone());
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_with_punctuation() {
        assert_eq!(slugify("Systemic risk, defined!"), "systemic-risk-defined");
    }

    #[test]
    fn test_slugify_multiple_spaces() {
        assert_eq!(slugify("Hello   World"), "hello-world");
    }

    #[test]
    fn test_slugify_mixed_case() {
        assert_eq!(slugify("AI Act"), "ai-act");
    }

    #[test]
    fn test_slugify_numbers() {
        assert_eq!(slugify("Commitment 10"), "commitment-10");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_hyphens() {
        assert_eq!(slugify("general--purpose"), "general-purpose");
        assert_eq!(slugify("-provider-"), "provider");
    }

    #[test]
    fn test_allocator_counters() {
        let mut alloc = SlugAllocator::new();
        assert_eq!(alloc.allocate("Scope"), "scope");
        assert_eq!(alloc.allocate("Scope"), "scope-2");
        assert_eq!(alloc.allocate("Scope"), "scope-3");
    }

    #[test]
    fn test_allocator_reserved() {
        let mut alloc = SlugAllocator::new();
        alloc.reserve("scope");
        assert_eq!(alloc.allocate("Scope"), "scope-2");
    }

    #[test]
    fn test_allocator_empty_text() {
        let mut alloc = SlugAllocator::new();
        assert_eq!(alloc.allocate("???"), "section");
        assert_eq!(alloc.allocate("???"), "section-2");
    }
}
