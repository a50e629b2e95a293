use crate::application::users::create::{DUPLICATE_PHONE_MESSAGE, duplicate_phone_as_validation};
use crate::application::users::get::USER_NOT_FOUND_MESSAGE;
use crate::domain::phone::{PhoneNumber, validate_phone_number};
use crate::domain::users::{UpdateUser, User, UserRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Full replacement of a user's fields.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_phone_number"))]
    #[schema(example = "+15551234567")]
    pub phone_number: String,
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

pub struct UpdateUserUseCase {
    repo: Arc<dyn UserRepository>,
}

impl UpdateUserUseCase {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, id: Uuid, req: UpdateUserRequest) -> Result<User, AppError> {
        let phone_number = PhoneNumber::parse(&req.phone_number)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if let Some(owner) = self.repo.find_by_phone_number(&phone_number).await? {
            if owner.id != id {
                return Err(AppError::ValidationError(DUPLICATE_PHONE_MESSAGE.to_string()));
            }
        }

        self.repo
            .update(
                id,
                UpdateUser {
                    phone_number,
                    name: req.name,
                },
            )
            .await
            .map_err(duplicate_phone_as_validation)?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))
    }
}
