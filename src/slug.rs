/// Derive a URL-safe slug from a display name.
///
/// Lowercase ASCII alphanumerics are kept; every other run of characters
/// collapses into a single hyphen. Leading and trailing separators are
/// trimmed, so the result is stable for the same input.
#[must_use]
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }

    slug
}
