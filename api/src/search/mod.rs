pub mod atoms;
mod compiler;
mod request;

pub use compiler::{CompiledFilter, CompiledQuery, FilterCompiler, UseCase};
pub use request::{DateBound, FilterRequest};
