pub mod account_service;
pub mod dto;
pub mod evaluator;
pub mod journal_service;
pub mod planner_service;
