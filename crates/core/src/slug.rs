//! Base-identity helpers shared by the grouper and the resolver.
//!
//! A slug's base identity is the slug with one trailing `-<digits>` suffix
//! removed; `hello-world` and `hello-world-2` share the base `hello-world`.

/// Strip a single trailing `-<digits>` suffix from a slug.
///
/// Digits anywhere else are untouched: `page-7-intro` keeps its name,
/// `page-intro-7` becomes `page-intro`.
pub fn base_slug(slug: &str) -> &str {
    match slug.rfind('-') {
        Some(idx) => {
            let tail = &slug[idx + 1..];
            if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
                &slug[..idx]
            } else {
                slug
            }
        }
        None => slug,
    }
}

/// Whether `slug` is a variant of `base`: the base itself, or the base
/// followed by a `-` separated suffix. `ca` is not a variant of `c`.
pub fn is_slug_variant(slug: &str, base: &str) -> bool {
    match slug.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.starts_with('-'),
        None => false,
    }
}
