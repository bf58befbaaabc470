pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;
