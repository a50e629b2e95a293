#[path = "../common/mod.rs"]
#[macro_use]
pub mod common;

mod articles;
mod auth;
mod users;
