pub mod solve;

pub use solve::{SolveError, Solution, SolveUseCase};
