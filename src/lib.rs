pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod output;
pub mod profile;
pub mod register;
pub mod report;
pub mod runner;
pub mod vector;

pub use config::FirCheckConfig;
pub use error::{FirCheckError, Result};
pub use profile::ValidationProfile;
pub use register::{CoefficientEntry, RegisterImage, pack};
pub use report::ValidationReport;
pub use runner::ValidationRunner;
