use crate::domain::auth::RefreshToken;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenDbModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_family: Uuid,
    pub parent_token_id: Option<Uuid>,
    pub revoked: bool,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl From<RefreshTokenDbModel> for RefreshToken {
    fn from(model: RefreshTokenDbModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            token_family: model.token_family,
            parent_token_id: model.parent_token_id,
            revoked: model.revoked,
            created_at: model.created_at,
            expires_at: model.expires_at,
        }
    }
}
