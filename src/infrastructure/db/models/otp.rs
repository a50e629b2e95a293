use crate::domain::otp::OneTimeCode;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct OneTimeCodeDbModel {
    pub phone_number: String,
    pub code_hash: String,
    pub expires_at: OffsetDateTime,
    pub attempts: i32,
    pub used: bool,
}

impl From<OneTimeCodeDbModel> for OneTimeCode {
    fn from(model: OneTimeCodeDbModel) -> Self {
        Self {
            phone_number: model.phone_number,
            code_hash: model.code_hash,
            expires_at: model.expires_at,
            attempts: model.attempts,
            used: model.used,
        }
    }
}
