//! Error types.
//!
//! - `BowtieError`: structured failures raised by the analysis library
//! - `AppError`: what the `bowtie` binary reports (message + process exit code)

/// Failures of the bowtie analysis itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BowtieError {
    #[error("invalid response data: {reason}")]
    InvalidResponseData { reason: String },
    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },
    #[error("channel '{channel}' has no energies within [{energy_min}, {energy_max}]")]
    EmptyChannelData {
        channel: String,
        energy_min: f64,
        energy_max: f64,
    },
    #[error("cannot locate a bowtie point for channel '{channel}': {reason}")]
    DegenerateSpectra { channel: String, reason: String },
    #[error("unknown channel '{channel}'")]
    UnknownChannel { channel: String },
    #[error("power-law spectra have not been produced for the current spectral index range")]
    SpectraNotProduced,
    #[error("spectra were produced on a different energy grid than the response table")]
    GridMismatch,
}

impl BowtieError {
    pub(crate) fn invalid_data(reason: impl Into<String>) -> Self {
        BowtieError::InvalidResponseData {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_range(reason: impl Into<String>) -> Self {
        BowtieError::InvalidRange {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(channel: &str, reason: impl Into<String>) -> Self {
        BowtieError::DegenerateSpectra {
            channel: channel.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit code used when this error reaches `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            BowtieError::InvalidResponseData { .. }
            | BowtieError::InvalidRange { .. }
            | BowtieError::UnknownChannel { .. } => 2,
            BowtieError::EmptyChannelData { .. } | BowtieError::DegenerateSpectra { .. } => 3,
            BowtieError::SpectraNotProduced | BowtieError::GridMismatch => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<BowtieError> for AppError {
    fn from(err: BowtieError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bowtie_errors_map_to_exit_codes() {
        let err: AppError = BowtieError::invalid_range("steps must be >= 1").into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("steps must be >= 1"));

        let err: AppError = BowtieError::degenerate("ch1", "all-zero response").into();
        assert_eq!(err.exit_code(), 3);
    }
}
