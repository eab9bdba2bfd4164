mod gender;
mod lift_record;
mod user;
mod weight_unit;

pub use gender::Gender;
pub use lift_record::LiftRecord;
pub use user::{User, UserStats};
pub use weight_unit::WeightUnit;
