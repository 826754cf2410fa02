mod types;

pub use types::{FireOutcome, FireReport};
