//! URL slug helpers.

/// Default slug for admin-managed products and categories.
///
/// Lower-cases the name and replaces each run of whitespace with `-`.
///
/// ```
/// assert_eq!(luxe_core::slug::slugify("Writing  Tools"), "writing-tools");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug for a seller submission.
///
/// Every run of characters outside `[a-z0-9]` collapses to a single `-`,
/// leading and trailing dashes are dropped, and `-{millis}` is appended so
/// two sellers listing "Vintage Lamp" never collide.
///
/// ```
/// assert_eq!(
///     luxe_core::slug::seller_slug("  Vintage Lamp (Brass)! ", 1_700_000_000_000),
///     "vintage-lamp-brass-1700000000000"
/// );
/// ```
#[must_use]
pub fn seller_slug(name: &str, millis: i64) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    format!("{slug}-{millis}")
}

/// Listing heading for a category slug.
///
/// Only the first dash becomes a space; each word is then capitalised.
///
/// ```
/// assert_eq!(luxe_core::slug::category_title("ai-robots"), "Ai Robots");
/// ```
#[must_use]
pub fn category_title(slug: &str) -> String {
    let spaced = slug.replacen('-', " ", 1);
    let mut title = String::with_capacity(spaced.len());
    let mut at_word_start = true;

    for c in spaced.chars() {
        if at_word_start && c.is_alphanumeric() {
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }

    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("AI Robots"), "ai-robots");
        assert_eq!(slugify("  Premium\tPens  "), "premium-pens");
        assert_eq!(slugify("Shoes"), "shoes");
    }

    #[test]
    fn test_slugify_keeps_punctuation() {
        assert_eq!(slugify("Tools & Machines"), "tools-&-machines");
    }

    #[test]
    fn test_seller_slug_strips_edges() {
        assert_eq!(seller_slug("--Hello--World--", 42), "hello-world-42");
        assert_eq!(seller_slug("Café Noir", 7), "caf-noir-7");
    }

    #[test]
    fn test_seller_slug_of_symbols_only() {
        assert_eq!(seller_slug("!!!", 5), "-5");
    }

    #[test]
    fn test_category_title() {
        assert_eq!(category_title("clothing"), "Clothing");
        assert_eq!(category_title("writing-tools"), "Writing Tools");
        assert_eq!(category_title("a-b-c"), "A B-C");
    }
}
