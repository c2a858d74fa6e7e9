pub mod distributions;
pub mod source;
