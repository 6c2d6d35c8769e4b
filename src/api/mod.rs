pub mod attendance;
pub mod leave;
pub mod reports;
pub mod roster;
pub mod working_days;
