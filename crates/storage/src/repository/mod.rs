pub mod lift;
pub mod user;

pub use lift::LiftRepository;
pub use user::UserRepository;
