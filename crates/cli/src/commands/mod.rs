//! Command implementations.

mod run;
mod validate;

pub use run::run_hunt;
pub use validate::run_validate;
