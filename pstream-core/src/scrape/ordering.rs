//! Candidate ordering
//!
//! Deterministic ordering of source and embed candidates from the registry
//! list, the per-media failure memory, and user preferences.

use std::collections::HashSet;

use crate::models::ScrapePreferences;

use super::engine::SourceListing;

/// Build the ordered source candidate list for one scrape attempt.
///
/// 1. All registry sources, in registry order.
/// 2. Sources that already failed for this media are removed.
/// 3. With custom ordering enabled, user-ranked sources come first (in rank
///    order), everything else follows in registry order.
/// 4. With prioritization enabled, the last successful source moves to the
///    front.
/// 5. When resuming, everything up to and including the resume source is
///    truncated. The truncation applies to the fully-customized ordering, so
///    a resumed attempt continues exactly where the original ordering left
///    off and never reorders the remainder.
#[must_use]
pub fn build_source_order(
    listings: &[SourceListing],
    preferences: &ScrapePreferences,
    failed_sources: &[String],
    resume_after: Option<&str>,
) -> Vec<String> {
    let failed: HashSet<&str> = failed_sources.iter().map(String::as_str).collect();
    let mut order: Vec<String> = listings
        .iter()
        .map(|listing| listing.id.clone())
        .filter(|id| !failed.contains(id.as_str()))
        .collect();

    if preferences.enable_source_order {
        order = rank_first(order, &preferences.source_order);
    }

    if preferences.prioritize_last_successful {
        if let Some(last) = preferences.last_successful_source.as_deref() {
            move_to_front(&mut order, last);
        }
    }

    if let Some(resume) = resume_after {
        if let Some(pos) = order.iter().position(|id| id == resume) {
            order.drain(..=pos);
        }
    }

    order
}

/// Build the embed ranking handed to the engine.
///
/// Only meaningful when the user enabled custom embed ordering; otherwise the
/// engine's own order applies (empty list). Embeds that failed for this media
/// under any source are removed.
#[must_use]
pub fn build_embed_order(
    preferences: &ScrapePreferences,
    failed_embeds: &[String],
) -> Vec<String> {
    if !preferences.enable_embed_order {
        return Vec::new();
    }
    let failed: HashSet<&str> = failed_embeds.iter().map(String::as_str).collect();
    preferences
        .embed_order
        .iter()
        .filter(|id| !failed.contains(id.as_str()))
        .cloned()
        .collect()
}

/// Stable partition: ids present in `ranked` first (in `ranked` order),
/// the rest in their original order.
fn rank_first(order: Vec<String>, ranked: &[String]) -> Vec<String> {
    let present: HashSet<&str> = order.iter().map(String::as_str).collect();
    let ranked_present: Vec<String> = ranked
        .iter()
        .filter(|id| present.contains(id.as_str()))
        .cloned()
        .collect();
    let ranked_set: HashSet<&str> = ranked_present.iter().map(String::as_str).collect();

    let mut result = ranked_present.clone();
    result.extend(order.into_iter().filter(|id| !ranked_set.contains(id.as_str())));
    result
}

fn move_to_front(order: &mut Vec<String>, id: &str) {
    if let Some(pos) = order.iter().position(|candidate| candidate == id) {
        let item = order.remove(pos);
        order.insert(0, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings(ids: &[&str]) -> Vec<SourceListing> {
        ids.iter()
            .map(|id| SourceListing {
                id: (*id).to_string(),
                name: id.to_uppercase(),
            })
            .collect()
    }

    fn prefs() -> ScrapePreferences {
        ScrapePreferences {
            enable_source_order: true,
            source_order: vec!["d".to_string(), "a".to_string()],
            enable_embed_order: false,
            embed_order: Vec::new(),
            prioritize_last_successful: true,
            last_successful_source: Some("c".to_string()),
        }
    }

    #[test]
    fn test_full_ordering_scenario() {
        // Sources [a,b,c,d], failed [b], ranked [d,a], last successful c:
        // last-successful first, then the ranked remainder, b excluded.
        let order = build_source_order(
            &listings(&["a", "b", "c", "d"]),
            &prefs(),
            &["b".to_string()],
            None,
        );
        assert_eq!(order, vec!["c", "d", "a"]);
    }

    #[test]
    fn test_resume_truncates_customized_ordering() {
        // Same setup resumed after d: the original attempt's ordering was
        // [c,d,a], so the resumed attempt sees only [a].
        let order = build_source_order(
            &listings(&["a", "b", "c", "d"]),
            &prefs(),
            &["b".to_string()],
            Some("d"),
        );
        assert_eq!(order, vec!["a"]);
    }

    #[test]
    fn test_resume_from_unknown_source_keeps_full_order() {
        let order = build_source_order(&listings(&["a", "b"]), &ScrapePreferences::default(), &[], Some("zz"));
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_registry_order_without_preferences() {
        let mut preferences = ScrapePreferences::default();
        preferences.prioritize_last_successful = false;
        let order = build_source_order(&listings(&["x", "y", "z"]), &preferences, &[], None);
        assert_eq!(order, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_failed_sources_removed() {
        let mut preferences = ScrapePreferences::default();
        preferences.prioritize_last_successful = false;
        let order = build_source_order(
            &listings(&["x", "y", "z"]),
            &preferences,
            &["x".to_string(), "z".to_string()],
            None,
        );
        assert_eq!(order, vec!["y"]);
    }

    #[test]
    fn test_ranked_sources_lead_remainder_keeps_registry_order() {
        let preferences = ScrapePreferences {
            enable_source_order: true,
            source_order: vec!["c".to_string(), "zz".to_string(), "a".to_string()],
            prioritize_last_successful: false,
            ..ScrapePreferences::default()
        };
        // "zz" is not in the registry and is dropped; unranked b/d keep
        // their relative registry order.
        let order = build_source_order(&listings(&["a", "b", "c", "d"]), &preferences, &[], None);
        assert_eq!(order, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_last_successful_ignored_when_failed() {
        let preferences = ScrapePreferences {
            prioritize_last_successful: true,
            last_successful_source: Some("b".to_string()),
            ..ScrapePreferences::default()
        };
        let order = build_source_order(
            &listings(&["a", "b", "c"]),
            &preferences,
            &["b".to_string()],
            None,
        );
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn test_embed_order_disabled_yields_engine_default() {
        assert!(build_embed_order(&ScrapePreferences::default(), &[]).is_empty());
    }

    #[test]
    fn test_embed_order_filters_failed() {
        let preferences = ScrapePreferences {
            enable_embed_order: true,
            embed_order: vec!["upcloud".to_string(), "vidcloud".to_string(), "mixdrop".to_string()],
            ..ScrapePreferences::default()
        };
        let order = build_embed_order(&preferences, &["vidcloud".to_string()]);
        assert_eq!(order, vec!["upcloud", "mixdrop"]);
    }
}
