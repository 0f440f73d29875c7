//! Financial-debt isolation. Balance-sheet labels for debt vary wildly in
//! wording and granularity, and explicit totals frequently coexist with
//! their current/non-current components; resolving a single defensible
//! number takes filtering, keyword scoring, fingerprint deduplication and
//! a tiered fallback.

use crate::patterns::{
    DEBT_CURRENT_HINTS, DEBT_EXCLUDE_TERMS, DEBT_INCLUDE_TERMS, DEBT_NON_CURRENT_HINTS,
    DEBT_TOTAL_HINTS,
};
use crate::schema::ConceptTable;
use crate::text::normalize_text;
use indexmap::map::Entry;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// Generic qualifier words stripped from labels when fingerprinting.
/// Order matters: "no corrientes" must go before "corrientes".
static QUALIFIER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\botros?\b",
        r"\btotales?\b",
        r"\bpasivos?\b",
        r"\bobligaciones?\b",
        r"\bfinancier[oa]s?\b",
        r"\bdeuda\b",
        r"\bprestamos?\b",
        r"\bno corrientes?\b",
        r"\bcorrientes?\b",
        r"\bcorto plazo\b",
        r"\blargo plazo\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid qualifier pattern"))
    .collect()
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// A liability line item that survived the inclusion/exclusion filter.
#[derive(Debug, Clone)]
struct DebtCandidate {
    concept: String,
    value: f64,
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// Keyword-weighted score with a mild `|value|^0.1` magnitude tiebreak
/// that never overrides the keyword signal.
fn candidate_score(concept: &str, value: f64) -> f64 {
    let mut score = 0.0;
    if concept.contains("deuda total") {
        score += 150.0;
    }
    if contains_any(concept, DEBT_TOTAL_HINTS) {
        score += 120.0;
    }
    if concept.contains("obligaciones financieras") {
        score += 70.0;
    }
    if concept.contains("pasivos financieros") {
        score += 65.0;
    }
    if concept.contains("deuda financiera") {
        score += 60.0;
    }
    if concept.contains("prestamo") {
        score += 45.0;
    }
    if contains_any(concept, DEBT_CURRENT_HINTS) || contains_any(concept, DEBT_NON_CURRENT_HINTS) {
        score += 20.0;
    }
    score + value.abs().powf(0.1)
}

fn is_non_current(concept: &str) -> bool {
    contains_any(concept, DEBT_NON_CURRENT_HINTS)
}

/// "no corriente" contains "corriente", so non-current must be ruled out
/// first.
fn is_current(concept: &str) -> bool {
    !is_non_current(concept) && contains_any(concept, DEBT_CURRENT_HINTS)
}

/// A concept is a total only when it carries a total hint and no
/// current/non-current qualifier.
fn is_total(concept: &str) -> bool {
    if is_current(concept) || is_non_current(concept) {
        return false;
    }
    contains_any(concept, DEBT_TOTAL_HINTS)
}

fn segment(concept: &str) -> &'static str {
    if is_total(concept) {
        "total"
    } else if is_current(concept) {
        "current"
    } else if is_non_current(concept) {
        "non_current"
    } else {
        "other"
    }
}

/// The label minus every generic qualifier word, whitespace re-collapsed.
fn strip_qualifiers(concept: &str) -> String {
    let mut base = normalize_text(concept);
    for pattern in QUALIFIER_PATTERNS.iter() {
        base = pattern.replace_all(&base, " ").into_owned();
    }
    WHITESPACE.replace_all(&base, " ").trim().to_string()
}

fn fingerprint(concept: &str) -> String {
    let core = strip_qualifiers(concept);
    let base = if core.is_empty() { "deuda" } else { core.as_str() };
    format!("{}|{}", segment(concept), base)
}

fn pick_best<'a>(
    candidates: &'a [DebtCandidate],
    predicate: impl Fn(&str) -> bool,
) -> Option<&'a DebtCandidate> {
    let mut best: Option<(&DebtCandidate, f64)> = None;
    for candidate in candidates {
        if !predicate(&candidate.concept) {
            continue;
        }
        let score = candidate_score(&candidate.concept, candidate.value);
        let better = match best {
            None => true,
            Some((current, current_score)) => {
                score > current_score
                    || (score == current_score && candidate.value.abs() > current.value.abs())
            }
        };
        if better {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Resolve total financial debt from a year's balance-sheet concepts.
///
/// 1. Keep concepts matching an inclusion term and no exclusion term.
/// 2. Collapse near-duplicate labels: group by (segment, qualifier-free
///    fingerprint, rounded magnitude), keeping the best-scoring entry.
/// 3. Resolve: an explicit total wins outright; otherwise the best
///    current and non-current components are re-deduplicated on a coarser
///    fingerprint and summed; otherwise the single best candidate.
///
/// `None` when nothing survives the filter.
pub fn resolve_financial_debt(balance_concepts: &ConceptTable) -> Option<f64> {
    let mut filtered: Vec<DebtCandidate> = Vec::new();
    for (raw_concept, value) in balance_concepts {
        let concept = normalize_text(raw_concept);
        if !contains_any(&concept, DEBT_INCLUDE_TERMS) {
            continue;
        }
        if contains_any(&concept, DEBT_EXCLUDE_TERMS) {
            continue;
        }
        filtered.push(DebtCandidate {
            concept,
            value: *value,
        });
    }

    if filtered.is_empty() {
        return None;
    }

    let mut deduped: IndexMap<String, (DebtCandidate, f64)> = IndexMap::new();
    for candidate in filtered {
        let dedupe_key = format!(
            "{}|{}",
            fingerprint(&candidate.concept),
            candidate.value.abs().round() as i64
        );
        let score = candidate_score(&candidate.concept, candidate.value);
        match deduped.entry(dedupe_key) {
            Entry::Vacant(slot) => {
                slot.insert((candidate, score));
            }
            Entry::Occupied(mut slot) => {
                let (current, current_score) = slot.get();
                if score > *current_score
                    || (score == *current_score && candidate.value.abs() > current.value.abs())
                {
                    slot.insert((candidate, score));
                }
            }
        }
    }
    let candidates: Vec<DebtCandidate> = deduped
        .into_values()
        .map(|(candidate, _)| candidate)
        .collect();

    if let Some(total) = pick_best(&candidates, is_total) {
        return Some(total.value);
    }

    let current = pick_best(&candidates, is_current);
    let non_current = pick_best(&candidates, is_non_current);

    let mut components: IndexMap<String, (f64, f64)> = IndexMap::new();
    for candidate in [current, non_current].into_iter().flatten() {
        let core = strip_qualifiers(&candidate.concept);
        let core = if core.is_empty() { "deuda".to_string() } else { core };
        let dedupe_key = format!("{}|{}", core, candidate.value.abs().round() as i64);
        let score = candidate_score(&candidate.concept, candidate.value);
        match components.entry(dedupe_key) {
            Entry::Vacant(slot) => {
                slot.insert((candidate.value, score));
            }
            Entry::Occupied(mut slot) => {
                let (current_value, current_score) = slot.get();
                if score > *current_score
                    || (score == *current_score && candidate.value.abs() > current_value.abs())
                {
                    slot.insert((candidate.value, score));
                }
            }
        }
    }
    if !components.is_empty() {
        return Some(components.values().map(|(value, _)| value).sum());
    }

    pick_best(&candidates, |_| true).map(|candidate| candidate.value)
}
