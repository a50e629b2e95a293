use crate::common;

use phoneauth::domain::articles::{ArticleRepository, ArticleStatus, NewArticle};
use phoneauth::infrastructure::repositories::articles::PostgresArticleRepository;
use serial_test::serial;
use time::{Duration, OffsetDateTime};

fn article(
    title: &str,
    scheduled_date: Option<OffsetDateTime>,
    archived_date: Option<OffsetDateTime>,
) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        content: "body".to_string(),
        scheduled_date,
        archived_date,
    }
}

#[tokio::test]
#[serial]
async fn test_find_by_status() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresArticleRepository::new(pool.clone());
    let now = OffsetDateTime::now_utc();

    repo.create(article("live", None, None)).await.unwrap();
    repo.create(article("later", Some(now + Duration::days(1)), None))
        .await
        .unwrap();
    repo.create(article("old", None, Some(now - Duration::days(1))))
        .await
        .unwrap();
    repo.create(article(
        "live until tomorrow",
        Some(now - Duration::days(1)),
        Some(now + Duration::days(1)),
    ))
    .await
    .unwrap();

    let titles = |articles: Vec<phoneauth::domain::articles::Article>| {
        let mut titles: Vec<String> = articles.into_iter().map(|a| a.title).collect();
        titles.sort();
        titles
    };

    let published = repo
        .find_by_status(ArticleStatus::Published, now, 10, 0)
        .await
        .unwrap();
    assert_eq!(titles(published), vec!["live", "live until tomorrow"]);

    let scheduled = repo
        .find_by_status(ArticleStatus::Scheduled, now, 10, 0)
        .await
        .unwrap();
    assert_eq!(titles(scheduled), vec!["later"]);

    let archived = repo
        .find_by_status(ArticleStatus::Archived, now, 10, 0)
        .await
        .unwrap();
    assert_eq!(titles(archived), vec!["old"]);

    let page = repo
        .find_by_status(ArticleStatus::Published, now, 1, 1)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_set_archived_date() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresArticleRepository::new(pool.clone());

    let created = repo.create(article("t", None, None)).await.unwrap();
    let archived = repo
        .set_archived_date(created.id, Some(OffsetDateTime::now_utc()))
        .await
        .unwrap()
        .unwrap();
    assert!(archived.archived_date.is_some());

    let restored = repo.set_archived_date(created.id, None).await.unwrap().unwrap();
    assert!(restored.archived_date.is_none());

    assert!(
        repo.set_archived_date(uuid::Uuid::new_v4(), None)
            .await
            .unwrap()
            .is_none()
    );

    common::cleanup_test_db(&pool).await;
}
