use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirCheckError {
    #[error("Coefficient file {path}, line {line}: {reason}")]
    CoefficientParse {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Vector file {path}, line {line}: {reason}")]
    VectorParse {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Coefficient index {index} out of range: register holds {count} coefficients")]
    CoefficientIndexOutOfRange { index: usize, count: usize },

    #[error("Coefficient index {index} specified more than once")]
    DuplicateCoefficient { index: usize },

    #[error("Device transport error: {0}")]
    Transport(String),

    #[error("Undecodable device response: {0}")]
    ResponseDecode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FirCheckError {
    /// Per-sample failures the vector driver skips over instead of aborting.
    pub fn is_sample_decode(&self) -> bool {
        matches!(self, Self::ResponseDecode(_))
    }
}

pub type Result<T> = std::result::Result<T, FirCheckError>;
