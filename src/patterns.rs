//! Static pattern dictionaries mapping NIIF concept labels to indicator
//! categories, plus the term sets the debt resolver filters with. All
//! terms are pre-normalized Spanish filing vocabulary; matching happens
//! against [`crate::text::normalize_text`] output.

/// How many of the most recent years an analysis keeps by default.
pub const DEFAULT_LOOKBACK_YEARS: usize = 7;

/// Keyword patterns for one indicator category: exact label variants
/// checked first in order, then substring variants in order.
#[derive(Debug, Clone, Copy)]
pub struct ConceptPatterns {
    pub exact: &'static [&'static str],
    pub contains: &'static [&'static str],
}

pub const CURRENT_ASSETS_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["activos corrientes totales", "total activos corrientes"],
    contains: &["activos corrientes"],
};

pub const CURRENT_LIABILITIES_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["pasivos corrientes totales", "total de pasivos corrientes"],
    contains: &["pasivos corrientes"],
};

pub const TOTAL_ASSETS_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["total de activos", "activos totales"],
    contains: &["total de activos"],
};

pub const TOTAL_LIABILITIES_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["total pasivos", "pasivos totales"],
    contains: &["total pasivos"],
};

pub const TOTAL_EQUITY_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["patrimonio total", "total patrimonio"],
    contains: &["patrimonio total", "total patrimonio"],
};

pub const RETAINED_EARNINGS_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["ganancias acumuladas", "utilidades retenidas"],
    contains: &[
        "ganancias acumuladas",
        "utilidades retenidas",
        "resultados acumulados",
    ],
};

pub const REVENUE_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &[
        "ingresos de actividades ordinarias",
        "ingresos operacionales",
    ],
    contains: &[
        "ingresos de actividades ordinarias",
        "ingresos operacionales",
        "ingresos",
    ],
};

pub const NET_INCOME_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["ganancia (perdida)", "utilidad neta"],
    contains: &[
        "ganancia (perdida)",
        "utilidad neta",
        "resultado del periodo",
    ],
};

pub const EBIT_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &[
        "ganancia (perdida) por actividades de operacion",
        "utilidad operacional",
        "resultado operacional",
    ],
    contains: &[
        "actividades de operacion",
        "utilidad operacional",
        "resultado operacional",
    ],
};

pub const NET_CASH_FLOW_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &[
        "incremento (disminucion) neto en el efectivo y equivalentes al efectivo",
        "flujo de efectivo neto",
    ],
    contains: &["neto", "efectivo"],
};

/// Fallback used when the aggregate operating-expense bucket matches
/// nothing.
pub const OPERATING_EXPENSES_FALLBACK_PATTERNS: ConceptPatterns = ConceptPatterns {
    exact: &["gastos operacionales"],
    contains: &["gastos operacionales"],
};

pub const DEP_AMORT_CONTAINS: &[&str] = &["depreciacion", "amortizacion"];

pub const OPERATING_EXPENSE_CONTAINS: &[&str] = &[
    "gastos de administracion",
    "gastos de ventas",
    "gastos operacionales",
    "gastos de distribucion",
];

pub const DEBT_INCLUDE_TERMS: &[&str] = &[
    "obligaciones financieras",
    "pasivos financieros",
    "deuda financiera",
    "deuda total",
    "prestamos",
    "prestamo",
];

pub const DEBT_EXCLUDE_TERMS: &[&str] = &[
    "cuentas por pagar comerciales",
    "proveedores",
    "impuestos",
    "beneficios a empleados",
];

pub const DEBT_CURRENT_HINTS: &[&str] = &["corriente", "corto plazo"];

pub const DEBT_NON_CURRENT_HINTS: &[&str] = &["no corriente", "largo plazo"];

pub const DEBT_TOTAL_HINTS: &[&str] = &[
    "deuda total",
    "obligaciones financieras totales",
    "pasivos financieros totales",
    "total deuda",
    "total obligaciones financieras",
    "total pasivos financieros",
];
