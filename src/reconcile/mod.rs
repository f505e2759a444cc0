pub mod enrichment;
pub mod mutator;
pub mod remap;
pub mod resolver;
pub mod types;

pub use types::Resolution;
