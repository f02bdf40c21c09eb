pub mod account;
pub mod calendar;
pub mod extra_hours;
pub mod journal;
pub mod pattern;
pub mod planner;
