use crate::patterns::ConceptPatterns;
use crate::schema::ConceptTable;
use crate::text::normalize_text;

/// The fixed indicator schema. Keys are the stable snake_case identifiers
/// the presentation and report layers address metrics by; labels are the
/// human-readable Spanish names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Revenue,
    NetIncome,
    Ebitda,
    OperatingExpenses,
    WorkingCapital,
    FinancialDebt,
    WorkingCapitalDays,
    NetCashFlow,
    ZAltman,
    BalanceSheet,
}

impl Metric {
    /// The nine metrics whose absence triggers the per-year
    /// incomplete-data warning. `BalanceSheet` is a summary value, not a
    /// required indicator.
    pub const REQUIRED: [Metric; 9] = [
        Metric::Revenue,
        Metric::NetIncome,
        Metric::Ebitda,
        Metric::OperatingExpenses,
        Metric::WorkingCapital,
        Metric::FinancialDebt,
        Metric::WorkingCapitalDays,
        Metric::NetCashFlow,
        Metric::ZAltman,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Revenue => "ingresos",
            Metric::NetIncome => "utilidad_neta",
            Metric::Ebitda => "ebitda",
            Metric::OperatingExpenses => "gastos_operacionales",
            Metric::WorkingCapital => "capital_neto_trabajo",
            Metric::FinancialDebt => "deuda",
            Metric::WorkingCapitalDays => "dias_capital_trabajo",
            Metric::NetCashFlow => "flujo_caja",
            Metric::ZAltman => "z_altman",
            Metric::BalanceSheet => "balance_general",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Revenue => "Ingresos",
            Metric::NetIncome => "Utilidad neta",
            Metric::Ebitda => "EBITDA",
            Metric::OperatingExpenses => "Gastos operacionales",
            Metric::WorkingCapital => "Capital neto de trabajo",
            Metric::FinancialDebt => "Deuda",
            Metric::WorkingCapitalDays => "Dias de capital de trabajo",
            Metric::NetCashFlow => "Flujo de caja neto",
            Metric::ZAltman => "Z-Altman",
            Metric::BalanceSheet => "Balance general (Activos/Pasivos/Patrimonio)",
        }
    }
}

/// Exact-then-contains lookup over an insertion-ordered concept table.
/// Exact variants are tried in pattern order against whole labels; then
/// each contains-variant is tried, in order, against every concept in
/// table order, first hit winning.
pub fn find_value(concepts: &ConceptTable, patterns: &ConceptPatterns) -> Option<f64> {
    for candidate in patterns.exact {
        let key = normalize_text(candidate);
        if let Some(value) = concepts.get(&key) {
            return Some(*value);
        }
    }

    for needle in patterns.contains {
        let target = normalize_text(needle);
        for (concept_key, value) in concepts {
            if concept_key.contains(&target) {
                return Some(*value);
            }
        }
    }

    None
}

/// Sum every concept whose label contains any of the needles; each
/// concept counts once. `None` only when nothing matched.
pub fn sum_if_contains(concepts: &ConceptTable, needles: &[&str]) -> Option<f64> {
    let normalized: Vec<String> = needles.iter().map(|n| normalize_text(n)).collect();

    let mut total = 0.0;
    let mut matched = false;
    for (concept_key, value) in concepts {
        if normalized
            .iter()
            .any(|needle| concept_key.contains(needle.as_str()))
        {
            total += *value;
            matched = true;
        }
    }

    if matched {
        Some(total)
    } else {
        None
    }
}
