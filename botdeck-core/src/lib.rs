// src/lib.rs

pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod notion;
pub mod repositories;
pub mod services;
pub mod session;

pub use db::Database;
pub use botdeck_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient};
