//! End-to-end walkthrough: parse raw open-data rows, run the analysis and
//! print the indicator table for each selected year.
//!
//! Run with: cargo run --example analyze_company

use anyhow::Result;
use financial_indicator_engine::*;

fn main() -> Result<()> {
    let raw = r#"{
        "income": [
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Ingresos de actividades ordinarias", "valor": "1250000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Ganancia (pérdida)", "valor": "98000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Ganancia (pérdida) por actividades de operación", "valor": "160000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Gastos de administración", "valor": "210000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Depreciación y amortización", "valor": "45000"},
            {"nit": "890900240", "fecha_corte": "2023-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Ingresos de actividades ordinarias", "valor": "1100000"}
        ],
        "balance": [
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Activos corrientes totales", "valor": "540000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Pasivos corrientes totales", "valor": "310000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Total de activos", "valor": "1900000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Total pasivos", "valor": "820000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Patrimonio total", "valor": "1080000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Ganancias acumuladas", "valor": "430000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Obligaciones financieras corrientes", "valor": "120000"},
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Obligaciones financieras no corrientes", "valor": "230000"}
        ],
        "cashflow": [
            {"nit": "890900240", "fecha_corte": "2024-12-31T00:00:00.000",
             "periodo": "Periodo Actual",
             "concepto": "Incremento (disminución) neto en el efectivo y equivalentes al efectivo",
             "valor": "(15000)"}
        ]
    }"#;

    let rows: StatementRows = serde_json::from_str(raw)?;
    let company = CompanyRecord {
        nit: "890900240".to_string(),
        business_name: "Ejemplo S.A.S.".to_string(),
        ..Default::default()
    };

    let package = analyze_statements(company, &rows, &AnalysisOptions::default())?;

    println!("Analisis de {}", package.company.display_label());
    for year in &package.years {
        let snapshot = &package.snapshots[year];
        let metrics = &snapshot.indicators;

        println!("\n=== {} ===", year);
        println!(
            "  {:<28} {}",
            Metric::Revenue.label(),
            format_currency(metrics.revenue)
        );
        println!(
            "  {:<28} {}",
            Metric::NetIncome.label(),
            format_currency(metrics.net_income)
        );
        println!(
            "  {:<28} {}",
            Metric::Ebitda.label(),
            format_currency(metrics.ebitda)
        );
        println!(
            "  {:<28} {}",
            Metric::OperatingExpenses.label(),
            format_currency(metrics.operating_expenses)
        );
        println!(
            "  {:<28} {}",
            Metric::WorkingCapital.label(),
            format_currency(metrics.working_capital)
        );
        println!(
            "  {:<28} {}",
            Metric::FinancialDebt.label(),
            format_currency(metrics.financial_debt)
        );
        println!(
            "  {:<28} {}",
            Metric::WorkingCapitalDays.label(),
            format_number(metrics.working_capital_days, 1)
        );
        println!(
            "  {:<28} {}",
            Metric::NetCashFlow.label(),
            format_currency(metrics.net_cash_flow)
        );
        println!(
            "  {:<28} {} (zona: {})",
            Metric::ZAltman.label(),
            format_number(metrics.z_altman, 2),
            z_altman_zone(metrics.z_altman)
        );

        for warning in &snapshot.warnings {
            println!("  [aviso] {}", warning);
        }
    }

    Ok(())
}
