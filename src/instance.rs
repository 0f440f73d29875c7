use crate::amount::parse_amount;
use crate::normalizer::extract_year;
use crate::schema::RawLineItem;
use crate::text::normalize_text;
use indexmap::IndexMap;
use log::debug;
use std::collections::{BTreeMap, HashSet};

/// Composite identity of one filing instance: submission number, entry
/// point, taxonomy and instance code joined in order. `None` when all
/// four fields are blank; such rows carry no instance grouping and are
/// never excluded by instance preference.
pub fn filing_instance_key(row: &RawLineItem) -> Option<String> {
    let parts = [
        row.submission_number.trim(),
        row.entry_point_id.trim(),
        row.taxonomy_id.trim(),
        row.instance_code.trim(),
    ];
    if parts.iter().all(|part| part.is_empty()) {
        None
    } else {
        Some(parts.join("|"))
    }
}

/// Transient per-(year, instance) tally used to rank competing filings.
#[derive(Debug, Default)]
struct InstanceStats {
    row_count: i64,
    actual_count: i64,
    non_zero_count: i64,
    concepts: HashSet<String>,
    entry_point: String,
}

impl InstanceStats {
    /// Breadth of distinct concepts dominates, then current-period
    /// coverage, then informative (non-zero) rows, then sheer row count,
    /// plus the entry-point preference bonus.
    fn score(&self) -> i64 {
        self.concepts.len() as i64 * 6
            + self.actual_count * 4
            + self.non_zero_count * 2
            + self.row_count
            + entry_point_bonus(&self.entry_point)
    }
}

/// Separate (individual) statements are strongly preferred over
/// consolidated ones; any other recognized label still beats an empty
/// one.
fn entry_point_bonus(normalized_label: &str) -> i64 {
    if normalized_label.is_empty() {
        return 0;
    }
    if normalized_label.contains("separado") || normalized_label.contains("individual") {
        return 1000;
    }
    if normalized_label.contains("consolidado") {
        return -150;
    }
    80
}

fn is_actual_period(period_label: &str, year: i32) -> bool {
    let p = normalize_text(period_label);
    if p.is_empty() {
        return false;
    }
    if p.contains("actual") {
        return true;
    }
    p.contains(&year.to_string()) && !p.contains("anterior")
}

/// Pick one preferred filing instance per year. Years with no keyed rows
/// are absent from the result, meaning no instance filtering applies to
/// them. Score ties fall to the lexicographically greatest key.
pub fn select_preferred_instances(rows: &[RawLineItem]) -> BTreeMap<i32, String> {
    let mut by_year: BTreeMap<i32, IndexMap<String, InstanceStats>> = BTreeMap::new();

    for row in rows {
        let Some(year) = extract_year(&row.period_end) else {
            continue;
        };
        let Some(instance_key) = filing_instance_key(row) else {
            continue;
        };

        let stats = by_year
            .entry(year)
            .or_default()
            .entry(instance_key)
            .or_insert_with(|| InstanceStats {
                entry_point: normalize_text(&row.entry_point_label),
                ..Default::default()
            });
        stats.row_count += 1;
        if is_actual_period(&row.period_label, year) {
            stats.actual_count += 1;
        }
        if let Some(value) = parse_amount(&row.value) {
            if value != 0.0 {
                stats.non_zero_count += 1;
            }
        }
        let concept = normalize_text(&row.concept);
        if !concept.is_empty() {
            stats.concepts.insert(concept);
        }
    }

    let mut preferred = BTreeMap::new();
    for (year, instances) in &by_year {
        let mut best: Option<(&str, i64)> = None;
        for (key, stats) in instances {
            let score = stats.score();
            let better = match best {
                None => true,
                Some((best_key, best_score)) => {
                    score > best_score || (score == best_score && key.as_str() > best_key)
                }
            };
            if better {
                best = Some((key.as_str(), score));
            }
        }
        if let Some((key, score)) = best {
            debug!(
                "Preferred instance for {}: {} (score {}, {} competing)",
                year,
                key,
                score,
                instances.len()
            );
            preferred.insert(*year, key.to_string());
        }
    }

    preferred
}
