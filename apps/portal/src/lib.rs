pub mod admin;
pub mod auth;
pub mod biodata;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod routes;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;
