//! Handler modules for omnimind-api.

pub mod ai;
pub mod auth;
pub mod meetings;
pub mod notifications;
pub mod projects;
pub mod tasks;
