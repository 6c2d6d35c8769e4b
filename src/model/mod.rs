pub mod event;
pub mod user;
pub mod working_days;
