pub mod driver;
pub mod source;

pub use driver::{DriveOutcome, InputPrefix, VectorDriver};
pub use source::{SampleVector, load_vector, parse_vector};
