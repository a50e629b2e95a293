//! In-memory implementations of the storage and delivery traits.
//!
//! They follow the same atomicity rules as the Postgres and Redis versions (each
//! operation runs under one lock) so use-case tests exercise the real semantics.

use crate::domain::articles::{Article, ArticleRepository, ArticleStatus, NewArticle};
use crate::domain::auth::{NewRefreshToken, RefreshToken, RefreshTokenRepository, RotationOutcome};
use crate::domain::otp::{
    CodeDelivery, OneTimeCode, OneTimeCodeRepository, PendingOneTimeCode, UpsertOneTimeCode,
};
use crate::domain::phone::PhoneNumber;
use crate::domain::rate_limit::RateLimitStore;
use crate::domain::users::{DuplicatePhoneNumber, NewUser, UpdateUser, User, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    stale_lookups: Arc<AtomicBool>,
}

impl MockUserRepository {
    /// Make `find_by_phone_number` miss, as if a concurrent write landed right after it.
    pub fn set_stale_lookups(&self, stale: bool) {
        self.stale_lookups.store(stale, Ordering::SeqCst);
    }

    fn insert(users: &mut Vec<User>, phone_number: &PhoneNumber, name: Option<String>) -> User {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            phone_number: phone_number.to_string(),
            name,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.phone_number == new_user.phone_number.as_str())
        {
            return Err(DuplicatePhoneNumber.into());
        }
        Ok(Self::insert(&mut users, &new_user.phone_number, new_user.name))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_phone_number(&self, phone_number: &PhoneNumber) -> Result<Option<User>> {
        if self.stale_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.phone_number == phone_number.as_str())
            .cloned())
    }

    async fn upsert_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
        name: Option<String>,
    ) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users
            .iter()
            .find(|u| u.phone_number == phone_number.as_str())
        {
            return Ok(existing.clone());
        }
        Ok(Self::insert(&mut users, phone_number, name))
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, update: UpdateUser) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id != id && u.phone_number == update.phone_number.as_str())
        {
            return Err(DuplicatePhoneNumber.into());
        }
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.phone_number = update.phone_number.to_string();
            user.name = update.name;
            user.updated_at = OffsetDateTime::now_utc();
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

#[derive(Clone, Default)]
pub struct MockArticleRepository {
    articles: Arc<Mutex<Vec<Article>>>,
}

#[async_trait]
impl ArticleRepository for MockArticleRepository {
    async fn create(&self, article: NewArticle) -> Result<Article> {
        let article = Article {
            id: Uuid::new_v4(),
            title: article.title,
            content: article.content,
            scheduled_date: article.scheduled_date,
            archived_date: article.archived_date,
        };
        self.articles.lock().unwrap().push(article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        let articles = self.articles.lock().unwrap();
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_status(
        &self,
        status: ArticleStatus,
        now: OffsetDateTime,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>> {
        let articles = self.articles.lock().unwrap();
        Ok(articles
            .iter()
            .filter(|a| status.matches(a, now))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn set_archived_date(
        &self,
        id: Uuid,
        archived_date: Option<OffsetDateTime>,
    ) -> Result<Option<Article>> {
        let mut articles = self.articles.lock().unwrap();
        Ok(articles.iter_mut().find(|a| a.id == id).map(|article| {
            article.archived_date = archived_date;
            article.clone()
        }))
    }
}

#[derive(Clone, Default)]
pub struct MockOneTimeCodeRepository {
    codes: Arc<Mutex<HashMap<String, OneTimeCode>>>,
}

impl MockOneTimeCodeRepository {
    /// Current stored row, for assertions.
    pub fn get(&self, phone_number: &PhoneNumber) -> Option<OneTimeCode> {
        self.codes
            .lock()
            .unwrap()
            .get(phone_number.as_str())
            .cloned()
    }

    /// Overwrite a stored row, e.g. to move its expiry into the past.
    pub fn put(&self, code: OneTimeCode) {
        self.codes
            .lock()
            .unwrap()
            .insert(code.phone_number.clone(), code);
    }
}

struct MockPendingOneTimeCode {
    codes: Arc<Mutex<HashMap<String, OneTimeCode>>>,
    code: OneTimeCode,
}

#[async_trait]
impl PendingOneTimeCode for MockPendingOneTimeCode {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.codes
            .lock()
            .unwrap()
            .insert(self.code.phone_number.clone(), self.code);
        Ok(())
    }
}

#[async_trait]
impl OneTimeCodeRepository for MockOneTimeCodeRepository {
    async fn upsert(&self, code: UpsertOneTimeCode) -> Result<Box<dyn PendingOneTimeCode>> {
        Ok(Box::new(MockPendingOneTimeCode {
            codes: self.codes.clone(),
            code: OneTimeCode {
                phone_number: code.phone_number.to_string(),
                code_hash: code.code_hash,
                expires_at: code.expires_at,
                attempts: 0,
                used: false,
            },
        }))
    }

    async fn find_by_phone_number(&self, phone_number: &PhoneNumber) -> Result<Option<OneTimeCode>> {
        Ok(self.get(phone_number))
    }

    async fn record_failed_attempt(
        &self,
        phone_number: &PhoneNumber,
        code_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>> {
        let mut codes = self.codes.lock().unwrap();
        Ok(codes
            .get_mut(phone_number.as_str())
            .filter(|code| code.code_hash == code_hash && !code.used && code.attempts < max_attempts)
            .map(|code| {
                code.attempts += 1;
                code.attempts
            }))
    }

    async fn mark_used(
        &self,
        phone_number: &PhoneNumber,
        code_hash: &str,
        max_attempts: i32,
    ) -> Result<bool> {
        let mut codes = self.codes.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        match codes.get_mut(phone_number.as_str()) {
            Some(code)
                if code.code_hash == code_hash
                    && !code.used
                    && code.attempts < max_attempts
                    && !code.is_expired(now) =>
            {
                code.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockRefreshTokenRepository {
    tokens: Arc<Mutex<Vec<RefreshToken>>>,
}

impl MockRefreshTokenRepository {
    fn revoke_family_locked(tokens: &mut [RefreshToken], family: Uuid) -> u64 {
        let mut revoked = 0;
        for token in tokens.iter_mut().filter(|t| t.token_family == family && !t.revoked) {
            token.revoked = true;
            revoked += 1;
        }
        revoked
    }

    fn to_row(token: NewRefreshToken) -> RefreshToken {
        RefreshToken {
            id: token.id,
            user_id: token.user_id,
            token_family: token.token_family,
            parent_token_id: token.parent_token_id,
            revoked: false,
            created_at: OffsetDateTime::now_utc(),
            expires_at: token.expires_at,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        let row = Self::to_row(token);
        self.tokens.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn rotate(
        &self,
        jti: Uuid,
        family: Uuid,
        successor: NewRefreshToken,
    ) -> Result<RotationOutcome> {
        let mut tokens = self.tokens.lock().unwrap();

        let live = tokens
            .iter_mut()
            .find(|t| t.id == jti && t.token_family == family && !t.revoked);

        match live {
            Some(token) => {
                token.revoked = true;
                let successor = Self::to_row(successor);
                tokens.push(successor.clone());
                Ok(RotationOutcome::Rotated { successor })
            }
            None => {
                let revoked = Self::revoke_family_locked(&mut tokens, family);
                Ok(RotationOutcome::ReuseDetected { revoked })
            }
        }
    }

    async fn find_by_family(&self, family: Uuid) -> Result<Vec<RefreshToken>> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .filter(|t| t.token_family == family)
            .cloned()
            .collect())
    }
}

/// Fixed-window counter with the same reject-without-increment rule as Redis.
#[derive(Clone, Default)]
pub struct MockRateLimitStore {
    windows: Arc<Mutex<HashMap<String, (u64, Instant)>>>,
}

#[async_trait]
impl RateLimitStore for MockRateLimitStore {
    async fn hit(&self, key: &str, max_requests: u64, window_seconds: u64) -> Result<bool> {
        let mut windows = self.windows.lock().unwrap();
        let now = Instant::now();

        match windows.get_mut(key) {
            Some((count, expires_at)) if *expires_at > now => {
                if *count >= max_requests {
                    return Ok(false);
                }
                *count += 1;
                Ok(true)
            }
            _ => {
                windows.insert(
                    key.to_string(),
                    (1, now + Duration::from_secs(window_seconds.max(1))),
                );
                Ok(true)
            }
        }
    }
}

/// Records every delivered code; can be switched into a failing mode.
#[derive(Clone, Default)]
pub struct MockCodeDelivery {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<AtomicBool>,
}

impl MockCodeDelivery {
    pub fn failing() -> Self {
        let delivery = Self::default();
        delivery.set_failing(true);
        delivery
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Most recent code sent to `phone_number`.
    pub fn last_code(&self, phone_number: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone_number)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl CodeDelivery for MockCodeDelivery {
    async fn deliver(&self, phone_number: &PhoneNumber, code: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("SMS gateway returned 503 Service Unavailable");
        }
        self.sent
            .lock()
            .unwrap()
            .push((phone_number.to_string(), code.to_string()));
        Ok(())
    }
}
