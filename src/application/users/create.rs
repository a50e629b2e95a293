use crate::domain::phone::{PhoneNumber, validate_phone_number};
use crate::domain::users::{DuplicatePhoneNumber, NewUser, User, UserRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

pub const DUPLICATE_PHONE_MESSAGE: &str = "Phone number already registered";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_phone_number"))]
    #[schema(example = "+15551234567")]
    pub phone_number: String,
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
}

impl CreateUserRequest {
    /// Reject a phone number that already belongs to a user
    pub async fn validate_unique_phone(
        phone_number: &PhoneNumber,
        repo: &Arc<dyn UserRepository>,
    ) -> Result<(), AppError> {
        if repo.find_by_phone_number(phone_number).await?.is_some() {
            return Err(AppError::ValidationError(DUPLICATE_PHONE_MESSAGE.to_string()));
        }
        Ok(())
    }
}

/// Report a unique-index hit as the same 422 the up-front check gives.
pub(crate) fn duplicate_phone_as_validation(e: anyhow::Error) -> AppError {
    if e.is::<DuplicatePhoneNumber>() {
        AppError::ValidationError(DUPLICATE_PHONE_MESSAGE.to_string())
    } else {
        AppError::InternalServerError(e)
    }
}

pub struct CreateUserUseCase {
    repo: Arc<dyn UserRepository>,
}

impl CreateUserUseCase {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: CreateUserRequest) -> Result<User, AppError> {
        let phone_number = PhoneNumber::parse(&req.phone_number)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        CreateUserRequest::validate_unique_phone(&phone_number, &self.repo).await?;

        self.repo
            .create(NewUser {
                phone_number,
                name: req.name,
            })
            .await
            .map_err(duplicate_phone_as_validation)
    }
}
