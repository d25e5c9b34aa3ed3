pub mod aggregate;
pub mod convert;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;

pub use error::{ConvertError, Result, RowError};
