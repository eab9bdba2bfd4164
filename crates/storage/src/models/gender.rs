use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifter gender, which selects the DOTS coefficient set and the
/// body-weight clamp ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
}
