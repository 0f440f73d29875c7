use crate::amount::parse_amount;
use crate::instance::{filing_instance_key, select_preferred_instances};
use crate::schema::{NormalizedStatementTable, RawLineItem};
use crate::text::normalize_text;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Year of a filing fact: the leading four digits of the period-end text.
pub fn extract_year(period_end: &str) -> Option<i32> {
    period_end.get(..4)?.trim().parse().ok()
}

/// Priority of a period label when competing values exist for the same
/// (year, concept): an explicit current-period label wins, a prior-period
/// label always loses, a label carrying the year's digits beats an
/// unlabeled row.
pub fn period_score(period_label: &str, year: i32) -> i32 {
    let p = normalize_text(period_label);
    if p.is_empty() {
        return 1;
    }
    if p.contains("actual") {
        return 3;
    }
    if p.contains("anterior") {
        return 0;
    }
    if p.contains(&year.to_string()) {
        return 2;
    }
    1
}

struct Candidate {
    score: i32,
    magnitude: f64,
    value: f64,
}

/// Collapse raw rows into one value per (year, concept). Rows from
/// superseded filing instances are dropped first; remaining duplicates
/// resolve by period priority, then by greater absolute value. Concept
/// iteration order within a year is the arrival order of the winning
/// rows.
pub fn normalize_statement_rows(rows: &[RawLineItem]) -> NormalizedStatementTable {
    let preferred_by_year = select_preferred_instances(rows);

    let mut candidates: IndexMap<(i32, String), Candidate> = IndexMap::new();
    for row in rows {
        let Some(year) = extract_year(&row.period_end) else {
            continue;
        };

        if let (Some(preferred), Some(row_instance)) =
            (preferred_by_year.get(&year), filing_instance_key(row))
        {
            if *preferred != row_instance {
                continue;
            }
        }

        let concept = normalize_text(&row.concept);
        if concept.is_empty() {
            continue;
        }

        let Some(value) = parse_amount(&row.value) else {
            continue;
        };

        let score = period_score(&row.period_label, year);
        match candidates.entry((year, concept)) {
            Entry::Vacant(slot) => {
                slot.insert(Candidate {
                    score,
                    magnitude: value.abs(),
                    value,
                });
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get();
                if score > current.score
                    || (score == current.score && value.abs() > current.magnitude)
                {
                    slot.insert(Candidate {
                        score,
                        magnitude: value.abs(),
                        value,
                    });
                }
            }
        }
    }

    let mut result = NormalizedStatementTable::new();
    for ((year, concept), candidate) in candidates {
        result.entry(year).or_default().insert(concept, candidate.value);
    }
    result
}

/// Union of the years across the three statement categories, most recent
/// first, truncated to the lookback window. Empty when no category has
/// any year.
pub fn select_recent_years(
    income_map: &NormalizedStatementTable,
    balance_map: &NormalizedStatementTable,
    cashflow_map: &NormalizedStatementTable,
    lookback_years: usize,
) -> Vec<i32> {
    let years: BTreeSet<i32> = income_map
        .keys()
        .chain(balance_map.keys())
        .chain(cashflow_map.keys())
        .copied()
        .collect();

    let mut recent: Vec<i32> = years.into_iter().rev().collect();
    recent.truncate(lookback_years);
    recent
}
