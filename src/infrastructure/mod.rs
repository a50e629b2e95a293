pub mod auth;
pub mod code_hasher;
pub mod config;
pub mod db;
pub mod redis;
pub mod repositories;
pub mod sms;
pub mod state;
