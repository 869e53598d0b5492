//! Application services: the three user flows, over an injected store.
//!
//! Handlers stay thin; everything that decides *which* outcome a request gets
//! lives here and is expressed as a [`ServiceError`].

use std::sync::Arc;

use thiserror::Error;

use expense_tracker_auth::{PasswordError, PasswordHasher};
use expense_tracker_core::{DomainError, ExpenseDraft, ExpenseId, NewUser, User, UserId};
use expense_tracker_infra::{ExpenseStore, StoreError};

use crate::app::dto::{AddExpenseRequest, LoginRequest, RegisterRequest};

/// Why a flow did not succeed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user already registered")]
    AlreadyRegistered,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email on an expense does not belong to any user.
    #[error("unknown user")]
    Unauthorized,

    /// A value the schema requires was not supplied.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Everything a handler needs, constructed once in `main` (or a test).
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ExpenseStore>,
    hasher: PasswordHasher,
}

impl AppServices {
    pub fn new(store: Arc<dyn ExpenseStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &Arc<dyn ExpenseStore> {
        &self.store
    }

    /// A missing email can never match a row (`WHERE email = NULL`).
    async fn lookup(&self, email: Option<&str>) -> Result<Option<User>, ServiceError> {
        match email {
            Some(email) => Ok(self.store.find_user_by_email(email).await?),
            None => Ok(None),
        }
    }

    /// Check-then-insert. A concurrent registration that slips between the
    /// check and the insert is caught by the unique key and reported the same way.
    pub async fn register(&self, req: RegisterRequest) -> Result<UserId, ServiceError> {
        if self.lookup(req.email.as_deref()).await?.is_some() {
            return Err(ServiceError::AlreadyRegistered);
        }

        let password = req
            .password
            .ok_or_else(|| ServiceError::Internal("no password to hash".to_string()))?;
        let password_hash = self.hash(password).await?;

        let (Some(email), Some(username)) = (req.email, req.username) else {
            return Err(ServiceError::Rejected(
                "email and username are required".to_string(),
            ));
        };

        let id = self
            .store
            .insert_user(NewUser {
                email,
                username,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => ServiceError::AlreadyRegistered,
                other => ServiceError::Store(other),
            })?;

        tracing::info!(user_id = %id, "user registered");
        Ok(id)
    }

    /// Verify credentials. Issues nothing on success.
    pub async fn login(&self, req: LoginRequest) -> Result<UserId, ServiceError> {
        let user = self
            .lookup(req.email.as_deref())
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let password = req
            .password
            .ok_or_else(|| ServiceError::Internal("no password to verify".to_string()))?;

        if !self.verify(password, user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user.id)
    }

    /// Record an expense for whoever owns `email`.
    ///
    /// Knowing a registered email is all it takes; there is no session check.
    pub async fn add_expense(&self, req: AddExpenseRequest) -> Result<ExpenseId, ServiceError> {
        let user = self
            .lookup(req.email.as_deref())
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        let draft: ExpenseDraft = req.expense;
        let new_expense = draft.into_new_expense(user.id)?;
        let id = self.store.insert_expense(new_expense).await?;

        tracing::info!(user_id = %user.id, expense_id = %id, "expense added");
        Ok(id)
    }

    // bcrypt is CPU-bound; keep it off the async workers.
    async fn hash(&self, password: String) -> Result<String, ServiceError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(ServiceError::from)
    }

    async fn verify(&self, password: String, stored_hash: String) -> Result<bool, ServiceError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(ServiceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_tracker_infra::{InMemoryExpenseStore, MySqlExpenseStore};
    use serde_json::json;

    fn services() -> (Arc<InMemoryExpenseStore>, AppServices) {
        let store = Arc::new(InMemoryExpenseStore::new());
        let svc = AppServices::new(store.clone(), PasswordHasher::new(4));
        (store, svc)
    }

    fn register_req(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            username: Some("a".to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let (store, svc) = services();
        svc.register(register_req("a@x.com", "secret")).await.unwrap();

        let user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "secret");
        assert!(PasswordHasher::new(4).verify("secret", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn second_registration_conflicts() {
        let (store, svc) = services();
        svc.register(register_req("a@x.com", "secret")).await.unwrap();

        let err = svc.register(register_req("a@x.com", "other")).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyRegistered));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn registration_without_password_is_internal() {
        let (store, svc) = services();
        let mut req = register_req("a@x.com", "secret");
        req.password = None;

        assert!(matches!(svc.register(req).await, Err(ServiceError::Internal(_))));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn registration_without_username_is_rejected() {
        let (store, svc) = services();
        let mut req = register_req("a@x.com", "secret");
        req.username = None;

        assert!(matches!(svc.register(req).await, Err(ServiceError::Rejected(_))));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn login_outcomes() {
        let (_store, svc) = services();
        let id = svc.register(register_req("a@x.com", "secret")).await.unwrap();

        let ok = svc
            .login(LoginRequest {
                email: Some("a@x.com".to_string()),
                password: Some("secret".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(ok, id);

        let wrong = svc
            .login(LoginRequest {
                email: Some("a@x.com".to_string()),
                password: Some("wrong".to_string()),
            })
            .await;
        assert!(matches!(wrong, Err(ServiceError::InvalidCredentials)));

        let unknown = svc
            .login(LoginRequest {
                email: Some("b@x.com".to_string()),
                password: Some("secret".to_string()),
            })
            .await;
        assert!(matches!(unknown, Err(ServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn expense_is_linked_to_the_looked_up_user() {
        let (store, svc) = services();
        let user_id = svc.register(register_req("a@x.com", "secret")).await.unwrap();

        let req: AddExpenseRequest = serde_json::from_value(json!({
            "email": "a@x.com",
            "name": "Coffee",
            "amount": 3.5,
            "date": "2024-01-01",
            "type": "expense",
        }))
        .unwrap();
        svc.add_expense(req).await.unwrap();

        let rows = store.expenses_for_user(user_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, user_id);
    }

    #[tokio::test]
    async fn unknown_email_is_checked_before_inputs() {
        let (store, svc) = services();
        let req: AddExpenseRequest = serde_json::from_value(json!({ "email": "nobody@x.com" })).unwrap();

        assert!(matches!(svc.add_expense(req).await, Err(ServiceError::Unauthorized)));
        assert_eq!(store.expense_count(), 0);
    }

    #[tokio::test]
    async fn disconnected_store_surfaces_unavailable() {
        let svc = AppServices::new(Arc::new(MySqlExpenseStore::disconnected()), PasswordHasher::new(4));
        let err = svc.register(register_req("a@x.com", "secret")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unavailable)));
    }
}
