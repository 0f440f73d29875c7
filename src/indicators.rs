use crate::concepts::{find_value, sum_if_contains};
use crate::debt::resolve_financial_debt;
use crate::patterns::{
    CURRENT_ASSETS_PATTERNS, CURRENT_LIABILITIES_PATTERNS, DEP_AMORT_CONTAINS, EBIT_PATTERNS,
    NET_CASH_FLOW_PATTERNS, NET_INCOME_PATTERNS, OPERATING_EXPENSES_FALLBACK_PATTERNS,
    OPERATING_EXPENSE_CONTAINS, RETAINED_EARNINGS_PATTERNS, REVENUE_PATTERNS,
    TOTAL_ASSETS_PATTERNS, TOTAL_EQUITY_PATTERNS, TOTAL_LIABILITIES_PATTERNS,
};
use crate::schema::{
    BalanceSheetSummary, CashFlowStatementSummary, ConceptTable, IncomeStatementSummary,
    IndicatorSet, YearFinancialSnapshot,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Z''-score zone (emerging-markets Altman variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZAltmanZone {
    Solid,
    Grey,
    Risk,
    Indeterminate,
}

impl ZAltmanZone {
    pub fn as_str(self) -> &'static str {
        match self {
            ZAltmanZone::Solid => "solida",
            ZAltmanZone::Grey => "gris",
            ZAltmanZone::Risk => "riesgo",
            ZAltmanZone::Indeterminate => "indeterminado",
        }
    }
}

impl fmt::Display for ZAltmanZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a Z''-score: above 2.6 is solid, 1.1 to 2.6 is the grey zone,
/// below 1.1 is distress risk; an uncomputable score is indeterminate.
pub fn z_altman_zone(z_value: Option<f64>) -> ZAltmanZone {
    match z_value {
        None => ZAltmanZone::Indeterminate,
        Some(z) if z > 2.6 => ZAltmanZone::Solid,
        Some(z) if z >= 1.1 => ZAltmanZone::Grey,
        Some(_) => ZAltmanZone::Risk,
    }
}

fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let numerator = numerator?;
    let denominator = denominator?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// Build the normalized statements and the full indicator set for one
/// year. Missing operands propagate as `None` through every formula; the
/// nine required indicators that end up missing are reported in a single
/// warning, alphabetically sorted by metric key.
pub fn compute_year_snapshot(
    year: i32,
    income_concepts: &ConceptTable,
    balance_concepts: &ConceptTable,
    cashflow_concepts: &ConceptTable,
) -> YearFinancialSnapshot {
    let revenue = find_value(income_concepts, &REVENUE_PATTERNS);
    let net_income = find_value(income_concepts, &NET_INCOME_PATTERNS);
    let ebit = find_value(income_concepts, &EBIT_PATTERNS);

    let dep_amort = sum_if_contains(income_concepts, DEP_AMORT_CONTAINS);
    let mut ebitda = income_concepts.get("ebitda").copied();
    if ebitda.is_none() {
        if let Some(ebit_value) = ebit {
            ebitda = Some(ebit_value + dep_amort.unwrap_or(0.0));
        }
    }

    let mut operating_expenses = sum_if_contains(income_concepts, OPERATING_EXPENSE_CONTAINS);
    if operating_expenses.is_none() {
        operating_expenses = find_value(income_concepts, &OPERATING_EXPENSES_FALLBACK_PATTERNS);
    }

    let current_assets = find_value(balance_concepts, &CURRENT_ASSETS_PATTERNS);
    let current_liabilities = find_value(balance_concepts, &CURRENT_LIABILITIES_PATTERNS);
    let total_assets = find_value(balance_concepts, &TOTAL_ASSETS_PATTERNS);
    let total_liabilities = find_value(balance_concepts, &TOTAL_LIABILITIES_PATTERNS);
    let total_equity = find_value(balance_concepts, &TOTAL_EQUITY_PATTERNS);
    let retained_earnings = find_value(balance_concepts, &RETAINED_EARNINGS_PATTERNS);

    let net_cash_flow = find_value(cashflow_concepts, &NET_CASH_FLOW_PATTERNS);

    let working_capital = match (current_assets, current_liabilities) {
        (Some(assets), Some(liabilities)) => Some(assets - liabilities),
        _ => None,
    };

    let working_capital_days = match (working_capital, revenue) {
        (Some(capital), Some(rev)) if rev != 0.0 => Some((capital / rev) * 365.0),
        _ => None,
    };

    let financial_debt = resolve_financial_debt(balance_concepts);

    // Z'' = 6.56*X1 + 3.26*X2 + 6.72*X3 + 1.05*X4 (non-manufacturer /
    // emerging-markets calibration).
    // X1 = working capital / total assets
    // X2 = retained earnings / total assets
    // X3 = EBIT / total assets
    // X4 = equity / total liabilities
    let x1 = safe_div(working_capital, total_assets);
    let x2 = safe_div(retained_earnings, total_assets);
    let x3 = safe_div(ebit, total_assets);
    let x4 = safe_div(total_equity, total_liabilities);
    let z_altman = match (x1, x2, x3, x4) {
        (Some(x1), Some(x2), Some(x3), Some(x4)) => {
            Some(6.56 * x1 + 3.26 * x2 + 6.72 * x3 + 1.05 * x4)
        }
        _ => None,
    };

    let indicators = IndicatorSet {
        revenue,
        net_income,
        ebitda,
        operating_expenses,
        working_capital,
        financial_debt,
        working_capital_days,
        net_cash_flow,
        z_altman,
        total_assets,
    };

    let mut warnings = Vec::new();
    let missing = indicators.missing_required();
    if !missing.is_empty() {
        debug!("Year {}: missing indicators {}", year, missing.join(", "));
        warnings.push(format!("Datos incompletos para: {}", missing.join(", ")));
    }

    YearFinancialSnapshot {
        year,
        income_statement: IncomeStatementSummary {
            revenue,
            net_income,
            ebit,
            ebitda,
            operating_expenses,
        },
        balance_sheet: BalanceSheetSummary {
            current_assets,
            current_liabilities,
            total_assets,
            total_liabilities,
            total_equity,
            retained_earnings,
        },
        cash_flow: CashFlowStatementSummary { net_cash_flow },
        indicators,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> ConceptTable {
        entries
            .iter()
            .map(|(concept, value)| (concept.to_string(), *value))
            .collect()
    }

    fn income_fixture() -> ConceptTable {
        table(&[
            ("ingresos de actividades ordinarias", 1000.0),
            ("ganancia (perdida)", 120.0),
            ("ganancia (perdida) por actividades de operacion", 200.0),
            ("gastos de administracion", 150.0),
            ("gastos de ventas", 50.0),
            ("depreciacion", 30.0),
            ("amortizacion", 20.0),
        ])
    }

    fn balance_fixture() -> ConceptTable {
        table(&[
            ("activos corrientes totales", 600.0),
            ("pasivos corrientes totales", 300.0),
            ("total de activos", 2000.0),
            ("total pasivos", 900.0),
            ("obligaciones financieras corrientes", 250.0),
            ("obligaciones financieras no corrientes", 350.0),
            ("patrimonio total", 1100.0),
            ("ganancias acumuladas", 500.0),
        ])
    }

    fn cashflow_fixture() -> ConceptTable {
        table(&[(
            "incremento (disminucion) neto en el efectivo y equivalentes al efectivo",
            80.0,
        )])
    }

    #[test]
    fn test_basic_snapshot_metrics() {
        let snapshot = compute_year_snapshot(
            2024,
            &income_fixture(),
            &balance_fixture(),
            &cashflow_fixture(),
        );
        let metrics = &snapshot.indicators;

        assert_eq!(metrics.revenue, Some(1000.0));
        assert_eq!(metrics.net_income, Some(120.0));
        assert_eq!(metrics.ebitda, Some(250.0));
        assert_eq!(metrics.operating_expenses, Some(200.0));
        assert_eq!(metrics.working_capital, Some(300.0));
        assert!((metrics.working_capital_days.unwrap() - 109.5).abs() < 0.01);
        assert_eq!(metrics.financial_debt, Some(600.0));
        assert_eq!(metrics.net_cash_flow, Some(80.0));
        assert!(metrics.z_altman.is_some());
        assert_eq!(metrics.total_assets, Some(2000.0));
        assert!(snapshot.warnings.is_empty());
    }

    #[test]
    fn test_explicit_total_debt_wins() {
        let mut balance = balance_fixture();
        balance.insert("deuda total".to_string(), 510.0);

        let snapshot =
            compute_year_snapshot(2024, &income_fixture(), &balance, &cashflow_fixture());
        assert_eq!(snapshot.indicators.financial_debt, Some(510.0));
        assert!(snapshot.warnings.is_empty());
    }

    #[test]
    fn test_z_score_value() {
        let snapshot = compute_year_snapshot(
            2024,
            &income_fixture(),
            &balance_fixture(),
            &cashflow_fixture(),
        );
        // X1 = 300/2000, X2 = 500/2000, X3 = 200/2000, X4 = 1100/900
        let expected = 6.56 * 0.15 + 3.26 * 0.25 + 6.72 * 0.10 + 1.05 * (1100.0 / 900.0);
        assert!((snapshot.indicators.z_altman.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_direct_ebitda_concept_wins_over_derivation() {
        let mut income = income_fixture();
        income.insert("ebitda".to_string(), 400.0);

        let snapshot =
            compute_year_snapshot(2024, &income, &balance_fixture(), &cashflow_fixture());
        assert_eq!(snapshot.indicators.ebitda, Some(400.0));
    }

    #[test]
    fn test_ebitda_missing_without_ebit() {
        let income = table(&[
            ("ingresos de actividades ordinarias", 1000.0),
            ("depreciacion", 30.0),
        ]);
        let snapshot =
            compute_year_snapshot(2024, &income, &balance_fixture(), &cashflow_fixture());
        assert_eq!(snapshot.indicators.ebitda, None);
    }

    #[test]
    fn test_ebitda_from_ebit_alone_when_no_dep_amort() {
        let income = table(&[(
            "ganancia (perdida) por actividades de operacion",
            200.0,
        )]);
        let snapshot =
            compute_year_snapshot(2024, &income, &balance_fixture(), &cashflow_fixture());
        assert_eq!(snapshot.indicators.ebitda, Some(200.0));
    }

    #[test]
    fn test_operating_expenses_direct_fallback() {
        let income = table(&[
            ("ingresos de actividades ordinarias", 1000.0),
            ("gastos operacionales", 180.0),
        ]);
        let snapshot =
            compute_year_snapshot(2024, &income, &balance_fixture(), &cashflow_fixture());
        // The aggregate bucket already matches the literal concept.
        assert_eq!(snapshot.indicators.operating_expenses, Some(180.0));
    }

    #[test]
    fn test_working_capital_days_none_on_zero_revenue() {
        let mut income = income_fixture();
        income.insert("ingresos de actividades ordinarias".to_string(), 0.0);
        // IndexMap keeps the original insertion slot, so the exact match
        // now reads 0.
        let snapshot =
            compute_year_snapshot(2024, &income, &balance_fixture(), &cashflow_fixture());
        assert_eq!(snapshot.indicators.revenue, Some(0.0));
        assert_eq!(snapshot.indicators.working_capital_days, None);
    }

    #[test]
    fn test_missing_data_warning_lists_sorted_keys() {
        let snapshot = compute_year_snapshot(
            2024,
            &ConceptTable::new(),
            &ConceptTable::new(),
            &ConceptTable::new(),
        );
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(
            snapshot.warnings[0],
            "Datos incompletos para: capital_neto_trabajo, deuda, dias_capital_trabajo, \
             ebitda, flujo_caja, gastos_operacionales, ingresos, utilidad_neta, z_altman"
        );
    }

    #[test]
    fn test_z_none_when_total_assets_zero() {
        let mut balance = balance_fixture();
        balance.insert("total de activos".to_string(), 0.0);
        let snapshot =
            compute_year_snapshot(2024, &income_fixture(), &balance, &cashflow_fixture());
        assert_eq!(snapshot.indicators.z_altman, None);
        assert_eq!(snapshot.indicators.total_assets, Some(0.0));
    }

    #[test]
    fn test_zone_thresholds() {
        assert_eq!(z_altman_zone(Some(3.1)), ZAltmanZone::Solid);
        assert_eq!(z_altman_zone(Some(2.6)), ZAltmanZone::Grey);
        assert_eq!(z_altman_zone(Some(1.5)), ZAltmanZone::Grey);
        assert_eq!(z_altman_zone(Some(1.1)), ZAltmanZone::Grey);
        assert_eq!(z_altman_zone(Some(0.9)), ZAltmanZone::Risk);
        assert_eq!(z_altman_zone(None), ZAltmanZone::Indeterminate);
        assert_eq!(z_altman_zone(Some(3.1)).as_str(), "solida");
        assert_eq!(z_altman_zone(None).to_string(), "indeterminado");
    }
}
