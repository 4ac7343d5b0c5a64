//! Manual foreign-key check plans.
//!
//! Relations the table format cannot declare (multivalued or optional) are
//! collected as [`ManualForeignKeyCheck`]s while tables compile. This crate
//! groups them into one task per child table, validates plan documents and
//! renders the plan as make rules.

pub mod builder;
pub mod errors;
pub mod makefile;
pub mod model;
pub mod schema;
pub mod validate;

pub use builder::{build_plan, error_log_path, success_log_path};
pub use errors::{IssueSeverity, PlanError, ValidationIssue, ValidationReport};
pub use makefile::{CHECK_COMMAND_VARIABLE, render_makefile};
pub use model::{CheckPlan, CheckStep, CheckTask, PLAN_VERSION};
pub use schema::plan_json_schema;
pub use validate::{ValidatedPlan, validate_plan, validate_plan_json, validate_plan_model};

pub use tablewright_core::ManualForeignKeyCheck;
