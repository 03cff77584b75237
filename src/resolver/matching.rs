//! Fuzzy name matching over a candidate set.
//!
//! Pure functions only: no I/O, no state. Scoring is a distance in `[0, 1]`
//! (0 = identical after normalization) built on strsim's normalized
//! Levenshtein, plus a partial-word pass so "roadmap" finds "Q1 Roadmap".
//!
//! Selection rules:
//! - a candidate whose raw name equals the target verbatim wins outright
//! - otherwise the lowest distance wins; ties go to the earlier candidate
//! - the winner is returned only if its distance is `<= threshold`
//!
//! Because the winner does not depend on the threshold, moving the
//! threshold only ever toggles acceptance.

use std::sync::OnceLock;

use clickup_types::NamedEntity;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Default acceptance cutoff. Smaller values demand closer matches.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.3;

/// Targets shorter than this only get full-string scoring.
const MIN_PARTIAL_CHARS: usize = 3;

/// Added to substring hits so a full match always outranks one.
const PARTIAL_MATCH_PENALTY: f64 = 0.05;

/// Normalize a name for comparison.
///
/// NFKC fold, lowercase, punctuation to spaces, whitespace collapsed.
pub fn normalize_name(s: &str) -> String {
    let folded: String = s
        .nfkc()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distance between two already-normalized names.
///
/// Empty input on either side scores the maximum distance.
pub fn match_distance(target: &str, candidate: &str) -> f64 {
    if target.is_empty() || candidate.is_empty() {
        return 1.0;
    }

    let full = 1.0 - strsim::normalized_levenshtein(target, candidate);
    match partial_distance(target, candidate) {
        Some(partial) => full.min(partial),
        None => full,
    }
}

/// Best Levenshtein ratio of `target` against every same-length window of
/// `candidate`. Only defined when the target is long enough and strictly
/// shorter than the candidate.
fn partial_distance(target: &str, candidate: &str) -> Option<f64> {
    let target_len = target.chars().count();
    let cand: Vec<char> = candidate.chars().collect();
    if target_len < MIN_PARTIAL_CHARS || target_len >= cand.len() {
        return None;
    }

    let best_edits = cand
        .windows(target_len)
        .map(|window| {
            let window: String = window.iter().collect();
            strsim::levenshtein(target, &window)
        })
        .min()?;

    Some(best_edits as f64 / target_len as f64 + PARTIAL_MATCH_PENALTY)
}

/// Return the best-matching candidate for `target`, or `None`.
///
/// Candidates without a usable name are skipped. Never fails.
pub fn resolve_best_match<'a>(
    target: &str,
    candidates: &'a [NamedEntity],
    threshold: f64,
) -> Option<&'a NamedEntity> {
    if target.trim().is_empty() {
        return None;
    }

    // Verbatim hits win even when normalization leaves nothing to compare.
    if let Some(exact) = candidates
        .iter()
        .find(|c| c.name.as_deref() == Some(target))
    {
        return Some(exact);
    }

    let target_norm = normalize_name(target);
    if target_norm.is_empty() {
        return None;
    }

    let mut best: Option<(&NamedEntity, f64)> = None;
    for candidate in candidates {
        let Some(name) = candidate.name.as_deref().map(normalize_name) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let distance = match_distance(&target_norm, &name);
        // Strict comparison keeps the earliest candidate on ties.
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best.filter(|(_, distance)| *distance <= threshold)
        .map(|(candidate, _)| candidate)
}

/// User variant: an email-shaped target is first checked for an exact
/// (case-insensitive) email hit, then falls back to fuzzy username matching.
pub fn resolve_user_match<'a>(
    target: &str,
    candidates: &'a [NamedEntity],
    threshold: f64,
) -> Option<&'a NamedEntity> {
    let trimmed = target.trim();
    if looks_like_email(trimmed) {
        let hit = candidates.iter().find(|c| {
            c.email
                .as_deref()
                .is_some_and(|email| email.trim().eq_ignore_ascii_case(trimmed))
        });
        if hit.is_some() {
            return hit;
        }
    }

    resolve_best_match(target, candidates, threshold)
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
    })
}

/// Whole-string `local@domain.tld` check.
pub fn looks_like_email(s: &str) -> bool {
    email_re().is_match(s)
}
