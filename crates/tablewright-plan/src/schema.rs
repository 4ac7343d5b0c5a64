use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::CheckPlan;

/// Emit the JSON Schema for `foreign-keys.plan.json`.
pub fn plan_json_schema() -> RootSchema {
    schema_for!(CheckPlan)
}
