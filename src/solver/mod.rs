// solver/mod.rs
// Re-exports and module declarations for solver submodules

pub mod nnls;
pub mod optimizer;
pub use nnls::solve_nnls;
pub use optimizer::*;
