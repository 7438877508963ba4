//! Input/output helpers.
//!
//! - weekly sales CSV ingest + validation (`ingest`)
//! - saved-analyses JSON read/write (`analyses`)
//! - summary CSV export (`export`)

pub mod analyses;
pub mod export;
pub mod ingest;

pub use analyses::*;
pub use export::*;
pub use ingest::*;
