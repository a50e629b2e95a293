pub mod articles;
pub mod auth;
pub mod otp;
pub mod phone;
pub mod rate_limit;
pub mod users;
