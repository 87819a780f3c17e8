pub mod bound;
pub mod change;
pub mod requirement;
