use thiserror::Error;

/// Failure taxonomy shared between this core and the collaborators that
/// feed it (company search, open-data retrieval). The normalization and
/// indicator pipeline itself never fails on dirty data: unparseable values
/// and unmatched concepts collapse to `None` and surface through per-year
/// warnings instead. The only variant the core raises is
/// [`AnalysisError::DataUnavailable`], when no statement category has a
/// single usable year.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No se encontro la empresa: {0}")]
    CompanyNotFound(String),

    #[error("{0}")]
    DataUnavailable(String),

    #[error("El formato de la fuente cambio: {0}")]
    SourceFormat(String),

    #[error("Problema de conectividad: {0}")]
    Connectivity(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
