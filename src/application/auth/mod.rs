pub mod login;
pub mod otp;
pub mod refresh;
pub mod request_otp;
pub mod tokens;
