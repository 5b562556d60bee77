//! Command implementations.

pub mod catalog;
pub mod compile;
pub mod gaps;

pub use self::catalog::execute_catalog;
pub use self::compile::execute_compile;
pub use self::gaps::execute_gaps;
