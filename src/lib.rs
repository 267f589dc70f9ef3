pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod nav;
pub mod resources;
pub mod retry;
pub mod services;
pub mod state;
pub mod upstream;
