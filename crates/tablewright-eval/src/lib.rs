//! Post-generation checks over populated tables.
//!
//! Runs the manual foreign-key checks a generated plan describes and
//! assembles the unioned identifier tables synthetic relations point at.

pub mod checks;
pub mod engine;
pub mod errors;
pub mod model;
pub mod report;
pub mod union;

pub use checks::check_list_column;
pub use engine::{PlanRunner, load_plan};
pub use errors::EvalError;
pub use model::{CheckOutcome, PlanRunReport, RunPlanOptions, StepFailure, TaskOutcome, UnionReport};
pub use report::render_report;
pub use union::union_identifiers;
