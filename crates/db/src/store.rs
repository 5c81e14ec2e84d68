//! Persistence seam for customers.
//!
//! Handlers talk to a [`CustomerStore`] rather than to a pool directly so
//! the service can run against Postgres in production and against
//! [`MemoryCustomerStore`] in tests and local development without a
//! database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use crm_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::repositories::CustomerRepo;
use crate::DbPool;

/// Unique constraint guarding `customers.email`.
pub const EMAIL_CONSTRAINT: &str = "uq_customers_email";

/// CRUD over customer records. Every call is independent; no call spans
/// more than one record.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn create(&self, input: &CreateCustomer) -> Result<Customer, StoreError>;

    async fn list(&self) -> Result<Vec<Customer>, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Customer>, StoreError>;

    /// Returns `None` if no record with `id` exists.
    async fn update(
        &self,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, StoreError>;

    /// Returns the removed record, or `None` if no record with `id` exists.
    async fn delete(&self, id: DbId) -> Result<Option<Customer>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Short name reported by `/health`, e.g. `postgres`.
    fn backend(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`CustomerStore`] backed by the `customers` table.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: DbPool,
}

impl PgCustomerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn create(&self, input: &CreateCustomer) -> Result<Customer, StoreError> {
        CustomerRepo::create(&self.pool, input)
            .await
            .map_err(|e| map_email_conflict(e, &input.email))
    }

    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(CustomerRepo::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Customer>, StoreError> {
        Ok(CustomerRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, StoreError> {
        CustomerRepo::update(&self.pool, id, input).await.map_err(|e| {
            let email = input.email.as_deref().unwrap_or_default();
            map_email_conflict(e, email)
        })
    }

    async fn delete(&self, id: DbId) -> Result<Option<Customer>, StoreError> {
        Ok(CustomerRepo::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Turn a unique violation on [`EMAIL_CONSTRAINT`] into
/// [`StoreError::DuplicateEmail`]; pass every other error through.
fn map_email_conflict(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(EMAIL_CONSTRAINT)
        {
            tracing::debug!(email, "Rejected duplicate customer email");
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    StoreError::Database(err)
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    next_id: DbId,
    rows: BTreeMap<DbId, Customer>,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.rows
            .values()
            .any(|c| c.email == email && Some(c.id) != except)
    }
}

/// [`CustomerStore`] holding records in process memory.
///
/// Mirrors the Postgres behaviour that callers can observe: ids are never
/// reused, emails are unique, `updated_at` moves on every update.
#[derive(Default)]
pub struct MemoryCustomerStore {
    state: RwLock<MemoryState>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn create(&self, input: &CreateCustomer) -> Result<Customer, StoreError> {
        let mut state = self.state.write().await;
        if state.email_taken(&input.email, None) {
            return Err(StoreError::DuplicateEmail(input.email.clone()));
        }

        state.next_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: state.next_id,
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone: input.phone.clone(),
            company_name: input.company_name.clone(),
            address: input.address.clone(),
            city: input.city.clone(),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Customer>, StoreError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, StoreError> {
        let mut state = self.state.write().await;
        if !state.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &input.email {
            if state.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        let Some(customer) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        input.apply_to(customer);
        customer.updated_at = Utc::now();
        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<Option<Customer>, StoreError> {
        Ok(self.state.write().await.rows.remove(&id))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn new_customer(email: &str) -> CreateCustomer {
        CreateCustomer {
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids_and_defaults() {
        let store = MemoryCustomerStore::new();
        let first = store.create(&new_customer("a@b.com")).await.unwrap();
        let second = store.create(&new_customer("c@d.com")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(first.is_active);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryCustomerStore::new();
        let first = store.create(&new_customer("a@b.com")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(&new_customer("a@b.com")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryCustomerStore::new();
        store.create(&new_customer("a@b.com")).await.unwrap();
        let result = store.create(&new_customer("a@b.com")).await;
        assert_matches!(result, Err(StoreError::DuplicateEmail(email)) if email == "a@b.com");
    }

    #[tokio::test]
    async fn update_to_taken_email_is_rejected() {
        let store = MemoryCustomerStore::new();
        store.create(&new_customer("a@b.com")).await.unwrap();
        let other = store.create(&new_customer("c@d.com")).await.unwrap();

        let update = UpdateCustomer {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let result = store.update(other.id, &update).await;
        assert_matches!(result, Err(StoreError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn update_keeping_own_email_is_allowed() {
        let store = MemoryCustomerStore::new();
        let created = store.create(&new_customer("a@b.com")).await.unwrap();
        let update = UpdateCustomer {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let updated = store.update(created.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.email, "a@b.com");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let store = MemoryCustomerStore::new();
        let result = store.update(42, &UpdateCustomer::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_unknown_id_with_taken_email_returns_none() {
        let store = MemoryCustomerStore::new();
        store.create(&new_customer("a@b.com")).await.unwrap();
        let update = UpdateCustomer {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let result = store.update(999, &update).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn second_delete_returns_none() {
        let store = MemoryCustomerStore::new();
        let created = store.create(&new_customer("a@b.com")).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), Some(created.clone()));
        assert!(store.delete(created.id).await.unwrap().is_none());
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }
}
