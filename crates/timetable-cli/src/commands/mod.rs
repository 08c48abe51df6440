pub mod calendar;
pub mod notify;
pub mod schedule;
pub mod subscription;
