use crate::common;

use phoneauth::domain::phone::PhoneNumber;
use phoneauth::domain::users::{DuplicatePhoneNumber, NewUser, UpdateUser, UserRepository};
use phoneauth::infrastructure::repositories::users::PostgresUserRepository;
use serial_test::serial;

fn phone(s: &str) -> PhoneNumber {
    PhoneNumber::parse(s).unwrap()
}

#[tokio::test]
#[serial]
async fn test_user_repository_crud() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresUserRepository::new(pool.clone());

    let user = repo
        .create(NewUser {
            phone_number: phone("+15550001000"),
            name: Some("Ada".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(user.phone_number, "+15550001000");

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.name.as_deref(), Some("Ada"));
    assert!(
        repo.find_by_phone_number(&phone("+15550001000"))
            .await
            .unwrap()
            .is_some()
    );

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                phone_number: phone("+15550001001"),
                name: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.phone_number, "+15550001001");
    assert!(updated.name.is_none());
    assert!(updated.updated_at >= user.updated_at);

    assert!(repo.delete(user.id).await.unwrap());
    assert!(!repo.delete(user.id).await.unwrap());
    assert!(repo.find_by_id(user.id).await.unwrap().is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_user_repository_rejects_duplicate_phone() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresUserRepository::new(pool.clone());

    let new_user = || NewUser {
        phone_number: phone("+15550002000"),
        name: None,
    };
    repo.create(new_user()).await.unwrap();

    let err = repo.create(new_user()).await.unwrap_err();
    assert!(err.is::<DuplicatePhoneNumber>());

    let other = repo
        .create(NewUser {
            phone_number: phone("+15550002001"),
            name: None,
        })
        .await
        .unwrap();
    let err = repo
        .update(
            other.id,
            UpdateUser {
                phone_number: phone("+15550002000"),
                name: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is::<DuplicatePhoneNumber>());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_upsert_by_phone_number_keeps_existing() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresUserRepository::new(pool.clone());

    let first = repo
        .upsert_by_phone_number(&phone("+15550003000"), Some("Ada".to_string()))
        .await
        .unwrap();
    let second = repo
        .upsert_by_phone_number(&phone("+15550003000"), Some("Other".to_string()))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name.as_deref(), Some("Ada"));
    assert_eq!(repo.find_all(10, 0).await.unwrap().len(), 1);

    common::cleanup_test_db(&pool).await;
}
