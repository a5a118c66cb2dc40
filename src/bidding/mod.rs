pub mod admin;
pub mod commands;
pub mod model;
pub mod rules;
