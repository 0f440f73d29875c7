//! # Financial Indicator Engine
//!
//! A library for turning raw, inconsistent financial-statement line items
//! (as filed with the Colombian Superintendencia de Sociedades and served
//! through the open-data portal) into a canonical, deduplicated,
//! year-indexed view with a fixed set of derived indicators.
//!
//! ## Core Concepts
//!
//! - **Raw line item**: one filed fact — a concept label, a loosely
//!   formatted value, a period label, and the identity of the filing
//!   instance it came from
//! - **Filing instance**: one submitted statement document; a company-year
//!   often has several competing instances (amendments, consolidated vs
//!   separate scopes, different taxonomies) and exactly one is selected
//! - **Normalized statement table**: year -> concept -> single value,
//!   after instance filtering and duplicate resolution
//! - **Indicators**: revenue, net income, EBITDA, operating expenses,
//!   working capital, financial debt, working-capital days, net cash flow
//!   and the Altman Z''-score, each `None` when the inputs are missing
//!   rather than guessed
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_indicator_engine::*;
//!
//! let company = CompanyRecord {
//!     nit: "890900240".to_string(),
//!     business_name: "Ejemplo S.A.S.".to_string(),
//!     ..Default::default()
//! };
//!
//! let rows: StatementRows = serde_json::from_str(raw_json)?;
//! let package = analyze_statements(company, &rows, &AnalysisOptions::default())?;
//!
//! for year in &package.years {
//!     let snapshot = &package.snapshots[year];
//!     println!("{}: {:?}", year, snapshot.indicators.z_altman);
//! }
//! ```

pub mod amount;
pub mod concepts;
pub mod debt;
pub mod error;
pub mod indicators;
pub mod instance;
pub mod normalizer;
pub mod patterns;
pub mod schema;
pub mod text;

pub use amount::{format_currency, format_number, parse_amount, pct_change, RawValue};
pub use concepts::{find_value, sum_if_contains, Metric};
pub use debt::resolve_financial_debt;
pub use error::{AnalysisError, Result};
pub use indicators::{compute_year_snapshot, z_altman_zone, ZAltmanZone};
pub use instance::{filing_instance_key, select_preferred_instances};
pub use normalizer::{normalize_statement_rows, select_recent_years};
pub use patterns::{ConceptPatterns, DEFAULT_LOOKBACK_YEARS};
pub use schema::*;
pub use text::{normalize_nit, normalize_text};

use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

pub struct StatementAnalyzer;

impl StatementAnalyzer {
    /// Run the full pipeline for one company: normalize the three raw row
    /// lists, pick the years to report, and build one snapshot per year.
    ///
    /// Returns [`AnalysisError::DataUnavailable`] when no statement
    /// category yields a single usable year.
    pub fn analyze(
        company: CompanyRecord,
        rows: &StatementRows,
        options: &AnalysisOptions,
    ) -> Result<AnalysisPackage> {
        let income_map = normalize_statement_rows(&rows.income);
        let balance_map = normalize_statement_rows(&rows.balance);
        let cashflow_map = normalize_statement_rows(&rows.cashflow);

        debug!(
            "Normalized rows for nit={}: {} income years, {} balance years, {} cashflow years",
            company.nit,
            income_map.len(),
            balance_map.len(),
            cashflow_map.len()
        );

        let recent_years = select_recent_years(
            &income_map,
            &balance_map,
            &cashflow_map,
            options.lookback_years,
        );
        if recent_years.is_empty() {
            return Err(AnalysisError::DataUnavailable(
                "La empresa fue encontrada, pero no hay datos financieros recientes para analizar."
                    .to_string(),
            ));
        }

        let years = match &options.selected_years {
            Some(selected) => {
                let requested: BTreeSet<i32> = selected.iter().copied().collect();
                let filtered: Vec<i32> = requested
                    .into_iter()
                    .rev()
                    .filter(|year| recent_years.contains(year))
                    .collect();
                if filtered.is_empty() {
                    recent_years
                } else {
                    filtered
                }
            }
            None => recent_years,
        };

        let empty = ConceptTable::new();
        let mut snapshots = BTreeMap::new();
        for &year in &years {
            let income = income_map.get(&year).unwrap_or(&empty);
            let balance = balance_map.get(&year).unwrap_or(&empty);
            let cashflow = cashflow_map.get(&year).unwrap_or(&empty);

            let mut snapshot = compute_year_snapshot(year, income, balance, cashflow);

            if income.is_empty() {
                snapshot.warnings.push(
                    "No se encontro informacion del estado de resultados para este ano."
                        .to_string(),
                );
            }
            if balance.is_empty() {
                snapshot
                    .warnings
                    .push("No se encontro informacion de balance general para este ano.".to_string());
            }
            if cashflow.is_empty() {
                snapshot
                    .warnings
                    .push("No se encontro informacion de flujo de caja para este ano.".to_string());
            }

            snapshots.insert(year, snapshot);
        }

        info!(
            "Analysis complete nit={} years={}",
            company.nit,
            years
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(",")
        );

        Ok(AnalysisPackage {
            company,
            years,
            snapshots,
        })
    }
}

/// Convenience wrapper over [`StatementAnalyzer::analyze`].
pub fn analyze_statements(
    company: CompanyRecord,
    rows: &StatementRows,
    options: &AnalysisOptions,
) -> Result<AnalysisPackage> {
    StatementAnalyzer::analyze(company, rows, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(period_end: &str, concept: &str, value: &str) -> RawLineItem {
        RawLineItem {
            period_end: period_end.to_string(),
            period_label: "Periodo Actual".to_string(),
            concept: concept.to_string(),
            value: value.into(),
            ..Default::default()
        }
    }

    fn company() -> CompanyRecord {
        CompanyRecord {
            nit: "890900240".to_string(),
            business_name: "Ejemplo S.A.S.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_analyze_empty_rows_is_data_unavailable() {
        let result = analyze_statements(
            company(),
            &StatementRows::default(),
            &AnalysisOptions::default(),
        );
        assert!(matches!(result, Err(AnalysisError::DataUnavailable(_))));
    }

    #[test]
    fn test_analyze_appends_missing_category_warnings() {
        let rows = StatementRows {
            income: vec![row("2024-12-31", "Ingresos de actividades ordinarias", "1000")],
            balance: vec![],
            cashflow: vec![],
        };

        let package =
            analyze_statements(company(), &rows, &AnalysisOptions::default()).unwrap();
        assert_eq!(package.years, vec![2024]);

        let snapshot = &package.snapshots[&2024];
        assert!(snapshot
            .warnings
            .iter()
            .any(|w| w.contains("balance general")));
        assert!(snapshot.warnings.iter().any(|w| w.contains("flujo de caja")));
        assert!(!snapshot
            .warnings
            .iter()
            .any(|w| w.contains("estado de resultados")));
    }

    #[test]
    fn test_selected_years_filter_and_fallback() {
        let rows = StatementRows {
            income: vec![
                row("2024-12-31", "Ingresos de actividades ordinarias", "1000"),
                row("2023-12-31", "Ingresos de actividades ordinarias", "900"),
                row("2022-12-31", "Ingresos de actividades ordinarias", "800"),
            ],
            balance: vec![],
            cashflow: vec![],
        };

        let options = AnalysisOptions {
            selected_years: Some(vec![2023, 2022, 2023]),
            ..Default::default()
        };
        let package = analyze_statements(company(), &rows, &options).unwrap();
        assert_eq!(package.years, vec![2023, 2022]);

        // A selection that misses every available year falls back to all
        // recent years.
        let options = AnalysisOptions {
            selected_years: Some(vec![2010]),
            ..Default::default()
        };
        let package = analyze_statements(company(), &rows, &options).unwrap();
        assert_eq!(package.years, vec![2024, 2023, 2022]);
    }

    #[test]
    fn test_package_warnings_are_year_prefixed() {
        let rows = StatementRows {
            income: vec![row("2024-12-31", "Ingresos de actividades ordinarias", "1000")],
            balance: vec![],
            cashflow: vec![],
        };

        let package =
            analyze_statements(company(), &rows, &AnalysisOptions::default()).unwrap();
        let warnings = package.warnings();
        assert!(!warnings.is_empty());
        assert!(warnings.iter().all(|w| w.starts_with("2024: ")));
    }

    #[test]
    fn test_metric_rows_tabulation() {
        let rows = StatementRows {
            income: vec![
                row("2024-12-31", "Ingresos de actividades ordinarias", "1000"),
                row("2023-12-31", "Ingresos de actividades ordinarias", "900"),
            ],
            balance: vec![],
            cashflow: vec![],
        };

        let package =
            analyze_statements(company(), &rows, &AnalysisOptions::default()).unwrap();
        let table = package.metric_rows(&[Metric::Revenue, Metric::FinancialDebt]);
        assert_eq!(
            table,
            vec![
                (2023, vec![Some(900.0), None]),
                (2024, vec![Some(1000.0), None]),
            ]
        );
    }
}
