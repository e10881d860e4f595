pub mod auth;
pub mod blueprints;
pub mod companies;
pub mod health;
pub mod pages;
pub mod projects;
pub mod reports;
pub mod tasks;
pub mod users;
