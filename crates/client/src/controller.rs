//! Drives a [`CustomerView`] against a [`CustomerBackend`].

use crm_core::types::DbId;

use crate::api::CustomerBackend;
use crate::error::ClientResult;
use crate::model::Customer;
use crate::state::{CustomerView, SubmitRequest, SyncPolicy};

pub struct Controller<B> {
    backend: B,
    view: CustomerView,
    policy: SyncPolicy,
}

impl<B: CustomerBackend> Controller<B> {
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, SyncPolicy::default())
    }

    pub fn with_policy(backend: B, policy: SyncPolicy) -> Self {
        Self {
            backend,
            view: CustomerView::new(),
            policy,
        }
    }

    pub fn view(&self) -> &CustomerView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CustomerView {
        &mut self.view
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Fetch the full list into the cache.
    pub async fn load(&mut self) -> ClientResult<()> {
        self.view.begin_load();
        match self.backend.list().await {
            Ok(customers) => {
                tracing::debug!(count = customers.len(), "Loaded customers");
                self.view.load_succeeded(customers);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load customers");
                self.view.load_failed();
                Err(err.into())
            }
        }
    }

    /// Look up a record, from the cache when present.
    pub async fn find(&self, id: DbId) -> ClientResult<Customer> {
        match self.view.customer(id) {
            Some(customer) => Ok(customer.clone()),
            None => Ok(self.backend.get(id).await?),
        }
    }

    /// Open the edit form for `id`.
    pub async fn edit(&mut self, id: DbId) -> ClientResult<()> {
        let customer = self.find(id).await?;
        self.view.open_edit(customer);
        Ok(())
    }

    /// Open the delete confirmation for `id`.
    pub async fn request_delete(&mut self, id: DbId) -> ClientResult<()> {
        let customer = self.find(id).await?;
        self.view.request_delete(customer);
        Ok(())
    }

    /// Send the open form and sync the cache on success.
    pub async fn submit(&mut self) -> ClientResult<Customer> {
        let request = self.view.begin_submit()?;

        let result = match &request {
            SubmitRequest::Create(payload) => self.backend.create(payload).await,
            SubmitRequest::Update { id, payload } => self.backend.update(*id, payload).await,
        };

        match result {
            Ok(customer) => {
                tracing::info!(id = customer.id, email = %customer.email, "Saved customer");
                if self.view.submit_succeeded(customer.clone(), self.policy) {
                    // A failed refetch is recorded on the view; the save stands.
                    let _ = self.load().await;
                }
                Ok(customer)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to save customer");
                self.view.submit_failed();
                Err(err.into())
            }
        }
    }

    /// Delete the record held by the open confirmation dialog.
    pub async fn confirm_delete(&mut self) -> ClientResult<Customer> {
        let id = self.view.begin_delete()?;
        match self.backend.delete(id).await {
            Ok(customer) => {
                tracing::info!(id, "Deleted customer");
                self.view.delete_succeeded(id);
                Ok(customer)
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "Failed to delete customer");
                self.view.delete_failed();
                Err(err.into())
            }
        }
    }
}
