pub mod error;
pub mod generate;
pub mod io;
pub mod model;
pub mod products;
pub mod reconcile;

pub use error::{Result, ToolError};
