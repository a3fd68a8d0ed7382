//! Core value types for parameter binding.

mod value;

pub use value::{DataType, Value};
