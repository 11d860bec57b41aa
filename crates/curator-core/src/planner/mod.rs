pub mod prompts;
mod runner;

pub use runner::{coverage, parse_response, Planner, PlannerError};
