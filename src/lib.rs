pub mod accounts;
pub mod auction;
pub mod bidding;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod mailer;
pub mod notification;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod scheduler;
pub mod sms;
pub mod state;
pub mod watchers;
