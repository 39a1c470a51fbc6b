pub mod image;
pub mod packer;

pub use image::{CoefficientEntry, RegisterImage};
pub use packer::pack;
