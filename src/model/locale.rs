//! Locale resolution.
//!
//! A project declares its models against *canonical* locales (`en`, `de`,
//! `en-US`). The locale map expands a canonical locale into one or more
//! platform locales; an entry may be a literal (`en-US`) or a two-letter-
//! prefix glob (`en-*`) that expands against the platform's supported set
//! at resolution time.

use std::collections::BTreeMap;

use glob::Pattern;

/// Per-project locale map: canonical locale -> ordered resolution entries.
pub type LocaleMap = BTreeMap<String, Vec<String>>;

/// If `entry` is a two-letter-prefix glob (`en-*`), return the prefix.
pub fn glob_prefix(entry: &str) -> Option<&str> {
    let prefix = entry.strip_suffix("-*")?;
    if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(prefix)
    } else {
        None
    }
}

/// Resolve a canonical locale into the ordered list of platform locales.
///
/// Without a map entry the locale resolves to itself. Glob entries are
/// replaced by the matching platform-supported locales in the platform's
/// own order; literal entries pass through unchanged. Entries are not
/// deduplicated: overlapping maps are rejected at configuration load, not
/// here.
pub fn resolve(requested: &str, platform_supported: &[String], map: Option<&LocaleMap>) -> Vec<String> {
    let Some(entries) = map.and_then(|m| m.get(requested)) else {
        return vec![requested.to_string()];
    };

    let mut resolved = Vec::new();
    for entry in entries {
        if glob_prefix(entry).is_some() {
            // `Pattern::new` cannot fail for a `xx-*` entry.
            let pattern = Pattern::new(entry).expect("locale glob is a valid pattern");
            resolved.extend(
                platform_supported
                    .iter()
                    .filter(|locale| pattern.matches(locale))
                    .cloned(),
            );
        } else {
            resolved.push(entry.clone());
        }
    }
    resolved
}

/// The canonical locale whose forward entry claims `native`, if any.
pub fn claimant<'a>(native: &str, map: &'a LocaleMap) -> Option<&'a str> {
    for (canonical, entries) in map {
        for entry in entries {
            let claimed = if glob_prefix(entry).is_some() {
                Pattern::new(entry)
                    .expect("locale glob is a valid pattern")
                    .matches(native)
            } else {
                entry == native
            };
            if claimed {
                return Some(canonical);
            }
        }
    }
    None
}

/// Map a native locale back to the canonical locale that would have
/// produced it, scanning the map for a claiming forward entry. A native
/// locale nothing claims is its own canonical locale.
pub fn canonical_for(native: &str, map: &LocaleMap) -> String {
    claimant(native, map).unwrap_or(native).to_string()
}

/// What a map entry claims out of the native-locale space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleClaim {
    Literal(String),
    Prefix(String),
}

/// Classify a map entry as a literal or prefix claim.
pub fn claim_of(entry: &str) -> LocaleClaim {
    match glob_prefix(entry) {
        Some(prefix) => LocaleClaim::Prefix(prefix.to_string()),
        None => LocaleClaim::Literal(entry.to_string()),
    }
}

fn claims_overlap(a: &LocaleClaim, b: &LocaleClaim) -> bool {
    match (a, b) {
        (LocaleClaim::Literal(x), LocaleClaim::Literal(y)) => x == y,
        (LocaleClaim::Prefix(x), LocaleClaim::Prefix(y)) => x == y,
        (LocaleClaim::Literal(lit), LocaleClaim::Prefix(prefix))
        | (LocaleClaim::Prefix(prefix), LocaleClaim::Literal(lit)) => {
            lit.split('-').next().is_some_and(|head| head == prefix)
        }
    }
}

/// Find two canonical locales whose entries could resolve to the same
/// native locale. Reverse builds need every native locale to have exactly
/// one canonical owner, so this is rejected at configuration load.
///
/// Returns `(canonical_a, canonical_b, entry)` for the first overlap found.
pub fn find_overlap(map: &LocaleMap) -> Option<(String, String, String)> {
    let locales: Vec<(&String, Vec<LocaleClaim>)> = map
        .iter()
        .map(|(canonical, entries)| (canonical, entries.iter().map(|e| claim_of(e)).collect()))
        .collect();

    for (i, (locale_a, claims_a)) in locales.iter().enumerate() {
        for (locale_b, claims_b) in locales.iter().skip(i + 1) {
            for (claim_a, entry) in claims_a.iter().zip(&map[locale_a.as_str()]) {
                if claims_b.iter().any(|claim_b| claims_overlap(claim_a, claim_b)) {
                    return Some(((*locale_a).clone(), (*locale_b).clone(), entry.clone()));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> Vec<String> {
        ["en-US", "en-CA", "de-DE"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unmapped_locale_resolves_to_itself() {
        assert_eq!(resolve("fr-FR", &supported(), None), vec!["fr-FR"]);

        let map = LocaleMap::from([("en".to_string(), vec!["en-*".to_string()])]);
        assert_eq!(resolve("fr-FR", &supported(), Some(&map)), vec!["fr-FR"]);
    }

    #[test]
    fn test_glob_expands_in_platform_order() {
        let map = LocaleMap::from([("en".to_string(), vec!["en-*".to_string()])]);
        assert_eq!(resolve("en", &supported(), Some(&map)), vec!["en-US", "en-CA"]);
    }

    #[test]
    fn test_literals_pass_through_and_are_not_deduplicated() {
        let map = LocaleMap::from([(
            "en".to_string(),
            vec!["en-GB".to_string(), "en-*".to_string()],
        )]);
        assert_eq!(
            resolve("en", &supported(), Some(&map)),
            vec!["en-GB", "en-US", "en-CA"]
        );
    }

    #[test]
    fn test_glob_prefix_shape() {
        assert_eq!(glob_prefix("en-*"), Some("en"));
        assert_eq!(glob_prefix("en-US"), None);
        assert_eq!(glob_prefix("eng-*"), None);
        assert_eq!(glob_prefix("*"), None);
    }

    #[test]
    fn test_canonical_for_scans_map() {
        let map = LocaleMap::from([
            ("en".to_string(), vec!["en-*".to_string()]),
            ("de".to_string(), vec!["de-DE".to_string()]),
        ]);
        assert_eq!(canonical_for("en-US", &map), "en");
        assert_eq!(canonical_for("de-DE", &map), "de");
        // Unclaimed locales are their own canonical locale.
        assert_eq!(canonical_for("fr-FR", &map), "fr-FR");
        assert_eq!(claimant("en-US", &map), Some("en"));
        assert_eq!(claimant("fr-FR", &map), None);
    }

    #[test]
    fn test_overlap_literal_vs_glob() {
        let map = LocaleMap::from([
            ("en".to_string(), vec!["en-*".to_string()]),
            ("en-US".to_string(), vec!["en-US".to_string()]),
        ]);
        let (a, b, _) = find_overlap(&map).expect("overlap");
        assert_eq!((a.as_str(), b.as_str()), ("en", "en-US"));
    }

    #[test]
    fn test_no_overlap_for_disjoint_maps() {
        let map = LocaleMap::from([
            ("en".to_string(), vec!["en-*".to_string()]),
            ("de".to_string(), vec!["de-DE".to_string()]),
        ]);
        assert!(find_overlap(&map).is_none());
    }
}
