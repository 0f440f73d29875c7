use crate::amount::RawValue;
use crate::concepts::Metric;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized concept label -> single deduplicated value for one year.
/// Iteration order is the arrival order of the source rows; contains-based
/// concept matching depends on it, so this must stay an insertion-ordered
/// map.
pub type ConceptTable = IndexMap<String, f64>;

/// Year -> concept table, the output of statement normalization.
pub type NormalizedStatementTable = BTreeMap<i32, ConceptTable>;

/// One filed fact exactly as returned by the open-data service. Every
/// field is optional on the wire; absent or empty fields make the row
/// unusable for a given purpose but are never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawLineItem {
    #[serde(rename = "nit", default)]
    #[schemars(description = "Company tax id (NIT) the fact was filed under")]
    pub company_id: String,

    #[serde(rename = "fecha_corte", default)]
    #[schemars(description = "Period-end date text; the year is its leading four digits")]
    pub period_end: String,

    #[serde(rename = "periodo", default)]
    #[schemars(description = "Free-text period label, e.g. 'Periodo Actual' or 'Periodo Anterior'")]
    pub period_label: String,

    #[serde(rename = "concepto", default)]
    #[schemars(description = "Free-text accounting concept label")]
    pub concept: String,

    #[serde(rename = "valor", default)]
    #[schemars(description = "Filed value, as a number or a loosely formatted string")]
    pub value: RawValue,

    #[serde(rename = "numero_radicado", default)]
    #[schemars(description = "Submission number of the filing instance")]
    pub submission_number: String,

    #[serde(rename = "id_punto_entrada", default)]
    #[schemars(description = "Entry-point id of the filing instance")]
    pub entry_point_id: String,

    #[serde(rename = "punto_entrada", default)]
    #[schemars(description = "Entry-point label, e.g. '50 NIIF Pymes - Separado Grupo 2'")]
    pub entry_point_label: String,

    #[serde(rename = "id_taxonomia", default)]
    #[schemars(description = "Reporting taxonomy id of the filing instance")]
    pub taxonomy_id: String,

    #[serde(rename = "codigo_instancia", default)]
    #[schemars(description = "Instance code of the filing instance")]
    pub instance_code: String,
}

/// Raw rows for one company, one list per statement category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StatementRows {
    #[serde(default)]
    #[schemars(description = "Income-statement rows")]
    pub income: Vec<RawLineItem>,

    #[serde(default)]
    #[schemars(description = "Balance-sheet rows")]
    pub balance: Vec<RawLineItem>,

    #[serde(default)]
    #[schemars(description = "Cash-flow-statement rows")]
    pub cashflow: Vec<RawLineItem>,
}

impl StatementRows {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(StatementRows)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

/// Company identity as produced by the search collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub nit: String,
    #[serde(rename = "razon_social")]
    pub business_name: String,
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(rename = "etapa_situacion", default)]
    pub situation_stage: String,
    #[serde(rename = "dependencia", default)]
    pub supervising_office: String,
    #[serde(rename = "expediente", default)]
    pub docket_number: String,
}

impl CompanyRecord {
    pub fn display_label(&self) -> String {
        format!("{} (NIT {})", self.business_name, self.nit)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementSummary {
    #[serde(rename = "ingresos")]
    pub revenue: Option<f64>,
    #[serde(rename = "utilidad_neta")]
    pub net_income: Option<f64>,
    #[serde(rename = "ebit")]
    pub ebit: Option<f64>,
    #[serde(rename = "ebitda")]
    pub ebitda: Option<f64>,
    #[serde(rename = "gastos_operacionales")]
    pub operating_expenses: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetSummary {
    #[serde(rename = "activos_corrientes")]
    pub current_assets: Option<f64>,
    #[serde(rename = "pasivos_corrientes")]
    pub current_liabilities: Option<f64>,
    #[serde(rename = "activos_totales")]
    pub total_assets: Option<f64>,
    #[serde(rename = "pasivos_totales")]
    pub total_liabilities: Option<f64>,
    #[serde(rename = "patrimonio_total")]
    pub total_equity: Option<f64>,
    #[serde(rename = "ganancias_acumuladas")]
    pub retained_earnings: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatementSummary {
    #[serde(rename = "flujo_caja")]
    pub net_cash_flow: Option<f64>,
}

/// The consolidated indicator set for one year. Serialized field names
/// match the metric keys consumed by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(rename = "ingresos")]
    pub revenue: Option<f64>,
    #[serde(rename = "utilidad_neta")]
    pub net_income: Option<f64>,
    #[serde(rename = "ebitda")]
    pub ebitda: Option<f64>,
    #[serde(rename = "gastos_operacionales")]
    pub operating_expenses: Option<f64>,
    #[serde(rename = "capital_neto_trabajo")]
    pub working_capital: Option<f64>,
    #[serde(rename = "deuda")]
    pub financial_debt: Option<f64>,
    #[serde(rename = "dias_capital_trabajo")]
    pub working_capital_days: Option<f64>,
    #[serde(rename = "flujo_caja")]
    pub net_cash_flow: Option<f64>,
    #[serde(rename = "z_altman")]
    pub z_altman: Option<f64>,
    #[serde(rename = "balance_general")]
    pub total_assets: Option<f64>,
}

impl IndicatorSet {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::NetIncome => self.net_income,
            Metric::Ebitda => self.ebitda,
            Metric::OperatingExpenses => self.operating_expenses,
            Metric::WorkingCapital => self.working_capital,
            Metric::FinancialDebt => self.financial_debt,
            Metric::WorkingCapitalDays => self.working_capital_days,
            Metric::NetCashFlow => self.net_cash_flow,
            Metric::ZAltman => self.z_altman,
            Metric::BalanceSheet => self.total_assets,
        }
    }

    /// Keys of the required metrics that are missing, alphabetically
    /// sorted. Feeds the per-year incomplete-data warning.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = Metric::REQUIRED
            .iter()
            .filter(|metric| self.get(**metric).is_none())
            .map(|metric| metric.key())
            .collect();
        missing.sort_unstable();
        missing
    }
}

/// Per-year result: normalized statements, the indicator set, and
/// advisory warnings (Spanish, shown verbatim to the user). Immutable
/// once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearFinancialSnapshot {
    pub year: i32,
    pub income_statement: IncomeStatementSummary,
    pub balance_sheet: BalanceSheetSummary,
    pub cash_flow: CashFlowStatementSummary,
    pub indicators: IndicatorSet,
    pub warnings: Vec<String>,
}

/// Analysis tuning supplied by the caller.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Keep at most this many of the most recent years.
    pub lookback_years: usize,
    /// Restrict to these years when they intersect the available ones;
    /// falls back to all recent years otherwise.
    pub selected_years: Option<Vec<i32>>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            lookback_years: crate::patterns::DEFAULT_LOOKBACK_YEARS,
            selected_years: None,
        }
    }
}

/// Full analysis result for one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPackage {
    pub company: CompanyRecord,
    /// Selected years, most recent first.
    pub years: Vec<i32>,
    pub snapshots: BTreeMap<i32, YearFinancialSnapshot>,
}

impl AnalysisPackage {
    /// All snapshot warnings flattened oldest-year first, each prefixed
    /// with its year.
    pub fn warnings(&self) -> Vec<String> {
        self.snapshots
            .values()
            .flat_map(|snapshot| {
                snapshot
                    .warnings
                    .iter()
                    .map(move |warning| format!("{}: {}", snapshot.year, warning))
            })
            .collect()
    }

    /// Tabulate the requested metrics per year, oldest first. One row per
    /// year in the same column order as `metrics`.
    pub fn metric_rows(&self, metrics: &[Metric]) -> Vec<(i32, Vec<Option<f64>>)> {
        self.snapshots
            .values()
            .map(|snapshot| {
                let values = metrics
                    .iter()
                    .map(|metric| snapshot.indicators.get(*metric))
                    .collect();
                (snapshot.year, values)
            })
            .collect()
    }
}
