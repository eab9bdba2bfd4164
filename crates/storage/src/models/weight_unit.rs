use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unit a weight was entered in, or should be displayed in. Storage is
/// always in pounds; this never appears in the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}
