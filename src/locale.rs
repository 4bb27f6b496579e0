// Copyright © 2024 SitemapFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # URL Localization Module
//!
//! Purely textual localization of URL paths: detecting, stripping and
//! inserting a locale code as a path segment immediately after the path base.
//! Nothing here re-resolves routing; the functions operate on the
//! path-and-query component only and the caller keeps scheme and host intact.

use std::fmt;

/// Identifier of a locale in the site's locale registry.
pub type LocaleId = u64;

/// One active locale of the site: a registry identifier plus the unique code
/// used as a URL path segment (e.g. `en`, `fr`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// The locale identifier, used for slug lookups.
    pub id: LocaleId,
    /// The unique locale code inserted into localized paths.
    pub code: String,
}

impl Locale {
    /// Creates a new locale value.
    pub fn new<S: Into<String>>(id: LocaleId, code: S) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Splits a path-and-query string into its path and optional query parts.
fn split_query(path_and_query: &str) -> (&str, Option<&str>) {
    match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    }
}

/// Normalizes a path base so that it never carries a trailing slash.
fn normalize_base(path_base: &str) -> &str {
    path_base.trim_end_matches('/')
}

/// Returns the part of `path` that follows the path base, including its
/// leading slash. A path outside the base is treated as already relative.
fn relative_to_base<'a>(path: &'a str, path_base: &str) -> &'a str {
    let base = normalize_base(path_base);
    if base.is_empty() {
        return path;
    }
    if path.len() >= base.len()
        && path[..base.len()].eq_ignore_ascii_case(base)
    {
        &path[base.len()..]
    } else {
        path
    }
}

/// Returns the first path segment after the base, if there is one.
fn first_segment<'a>(path: &'a str, path_base: &str) -> Option<&'a str> {
    let relative = relative_to_base(path, path_base);
    let trimmed = relative.trim_start_matches('/');
    let segment = trimmed.split('/').next().unwrap_or("");
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}

/// Detects which active locale, if any, a path is localized for.
///
/// The first path segment after the path base is compared case-insensitively
/// against the unique code of every locale in `locales`; iteration order
/// decides ties (unique codes should not collide in practice).
///
/// # Arguments
/// * `path_and_query` - The path-and-query component of a URL.
/// * `path_base` - The application path base (often empty).
/// * `locales` - The active locales to match against.
///
/// # Returns
/// * `Option<&Locale>` - The matching locale, or `None` when the path carries
///   no recognisable locale code.
pub fn detect_locale_from_path<'a>(
    path_and_query: &str,
    path_base: &str,
    locales: &'a [Locale],
) -> Option<&'a Locale> {
    let (path, _query) = split_query(path_and_query);
    let segment = first_segment(path, path_base)?;
    locales
        .iter()
        .find(|locale| locale.code.eq_ignore_ascii_case(segment))
}

/// Removes an existing locale code segment from a path, if one is present.
///
/// The query string is preserved untouched. A path without a recognisable
/// locale code is returned unchanged.
pub fn strip_locale_code(
    path_and_query: &str,
    path_base: &str,
    locales: &[Locale],
) -> String {
    let (path, query) = split_query(path_and_query);

    let stripped = match detect_locale_from_path(path, path_base, locales) {
        Some(locale) => {
            let base = normalize_base(path_base);
            let relative = relative_to_base(path, path_base);
            // The detected code matched the first segment, so it can be
            // dropped by length regardless of its casing in the path.
            let after_code =
                &relative.trim_start_matches('/')[locale.code.len()..];
            if after_code.is_empty() {
                format!("{}/", base)
            } else {
                format!("{}{}", base, after_code)
            }
        }
        None => path.to_string(),
    };

    match query {
        Some(query) => format!("{}?{}", stripped, query),
        None => stripped,
    }
}

/// Inserts a locale code as the first path segment after the path base.
///
/// The caller is expected to have stripped any existing locale code first;
/// [`localize_path`] composes both steps. The query string is preserved.
pub fn insert_locale_code(
    path_and_query: &str,
    path_base: &str,
    locale: &Locale,
) -> String {
    let (path, query) = split_query(path_and_query);
    let base = normalize_base(path_base);
    let relative = relative_to_base(path, path_base);

    let localized = if relative.is_empty() {
        format!("{}/{}", base, locale.code)
    } else if relative.starts_with('/') {
        format!("{}/{}{}", base, locale.code, relative)
    } else {
        format!("{}/{}/{}", base, locale.code, relative)
    };

    match query {
        Some(query) => format!("{}?{}", localized, query),
        None => localized,
    }
}

/// Produces the locale-qualified form of a canonical path: any existing
/// locale code is stripped and the target locale's code is inserted after the
/// path base.
pub fn localize_path(
    path_and_query: &str,
    path_base: &str,
    locales: &[Locale],
    target: &Locale,
) -> String {
    let stripped = strip_locale_code(path_and_query, path_base, locales);
    insert_locale_code(&stripped, path_base, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> Vec<Locale> {
        vec![Locale::new(1, "en"), Locale::new(2, "fr")]
    }

    #[test]
    fn test_detect_locale() {
        let locales = locales();
        let detected =
            detect_locale_from_path("/en/red-shoes", "", &locales);
        assert_eq!(detected.map(|l| l.id), Some(1));

        assert!(
            detect_locale_from_path("/red-shoes", "", &locales).is_none()
        );
    }

    #[test]
    fn test_detect_locale_is_case_insensitive() {
        let locales = locales();
        let detected =
            detect_locale_from_path("/FR/chaussures", "", &locales);
        assert_eq!(detected.map(|l| l.id), Some(2));
    }

    #[test]
    fn test_detect_locale_with_path_base() {
        let locales = locales();
        let detected =
            detect_locale_from_path("/shop/fr/chaussures", "/shop", &locales);
        assert_eq!(detected.map(|l| l.id), Some(2));

        // The base segment itself must not be mistaken for a locale code.
        assert!(
            detect_locale_from_path("/shop/chaussures", "/shop", &locales)
                .is_none()
        );
    }

    #[test]
    fn test_detect_locale_ignores_query() {
        let locales = locales();
        let detected =
            detect_locale_from_path("/en?page=2", "", &locales);
        assert_eq!(detected.map(|l| l.id), Some(1));
    }

    #[test]
    fn test_strip_locale_code() {
        let locales = locales();
        assert_eq!(
            strip_locale_code("/en/red-shoes", "", &locales),
            "/red-shoes"
        );
        assert_eq!(
            strip_locale_code("/red-shoes", "", &locales),
            "/red-shoes"
        );
        assert_eq!(strip_locale_code("/en", "", &locales), "/");
        assert_eq!(
            strip_locale_code("/shop/en/sale?page=2", "/shop", &locales),
            "/shop/sale?page=2"
        );
    }

    #[test]
    fn test_insert_locale_code() {
        let locales = locales();
        let fr = &locales[1];
        assert_eq!(insert_locale_code("/red-shoes", "", fr), "/fr/red-shoes");
        assert_eq!(insert_locale_code("/", "", fr), "/fr/");
        assert_eq!(
            insert_locale_code("/shop/sale?page=2", "/shop", fr),
            "/shop/fr/sale?page=2"
        );
    }

    #[test]
    fn test_localize_path_replaces_existing_code() {
        let locales = locales();
        let fr = &locales[1];
        assert_eq!(
            localize_path("/en/red-shoes", "", &locales, fr),
            "/fr/red-shoes"
        );
    }

    #[test]
    fn test_localize_round_trip() {
        // Strip-then-insert from a localized path must agree with a direct
        // insert from the bare canonical path.
        let locales = locales();
        let en = &locales[0];

        for canonical in ["/", "/red-shoes", "/sale/shoes?page=2"] {
            let direct = insert_locale_code(canonical, "", en);
            let round_trip = localize_path(&direct, "", &locales, en);
            assert_eq!(direct, round_trip);
        }
    }
}
