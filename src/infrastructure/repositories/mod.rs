pub mod articles;
pub mod mock;
pub mod one_time_codes;
pub mod refresh_tokens;
pub mod users;
