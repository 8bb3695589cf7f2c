//! URL slugs derived from titles.

/// Map a title to a URL-safe slug.
///
/// Lowercases, turns whitespace into hyphens, drops anything outside
/// `[a-z0-9-]` and collapses hyphen runs. The result is empty only when the
/// title has no ASCII alphanumerics. Uniqueness is the caller's concern.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());

    for ch in title.chars().flat_map(char::to_lowercase) {
        let next = match ch {
            'a'..='z' | '0'..='9' => ch,
            '-' => '-',
            c if c.is_whitespace() => '-',
            _ => continue,
        };
        if next == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(next);
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Whether `slug` is already in canonical form (`^[a-z0-9]+(-[a-z0-9]+)*$`).
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Append a numeric disambiguator: `hello-world` + 2 → `hello-world-2`.
pub fn with_suffix(base: &str, suffix: impl std::fmt::Display) -> String {
    format!("{base}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("Hello World v2"), "hello-world-v2");
    }

    #[test]
    fn test_slugify_collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("  Rust   --  in   Production  "), "rust-in-production");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("tabs\tand\nnewlines"), "tabs-and-newlines");
    }

    #[test]
    fn test_slugify_drops_non_ascii_and_underscores() {
        assert_eq!(slugify("Café_Au Lait"), "cafau-lait");
        assert_eq!(slugify("C++ & Rust: 2024"), "c-rust-2024");
    }

    #[test]
    fn test_slugify_empty_without_alphanumerics() {
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_output_is_canonical() {
        let titles = [
            "Hello, World!",
            "  Mixed CASE and   spacing ",
            "Ends with dash -",
            "-starts with dash",
            "Numbers 123 and symbols #@$",
            "UPPER_lower-Mixed 99",
            "ünïcödé Title",
        ];
        for title in titles {
            let slug = slugify(title);
            assert!(is_valid_slug(&slug), "{title:?} produced {slug:?}");
        }
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Same Title"), slugify("Same Title"));
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Hello"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug("-a"));
        assert!(!is_valid_slug("a b"));
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("hello-world", 2), "hello-world-2");
    }
}
