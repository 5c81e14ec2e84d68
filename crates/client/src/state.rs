//! View state for the customer screen.
//!
//! [`CustomerView`] owns the cached records and the list, editor and delete
//! dialog states. Every transition is a synchronous method; the
//! [`Controller`](crate::controller::Controller) performs the requests in
//! between and reports outcomes back through the `*_succeeded` / `*_failed`
//! methods.

use std::collections::BTreeMap;

use crm_core::types::DbId;
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};
use crate::model::{Customer, CustomerForm, FormErrors};

pub const LOAD_FAILED: &str = "Failed to fetch customers. Please try again later.";
pub const SAVE_FAILED: &str = "Failed to save customer. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete customer.";

/// How the cache is brought back in line after a successful create/update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Re-fetch the whole list.
    #[default]
    Refetch,
    /// Upsert the returned record into the cache by id.
    Patch,
}

/// Which form, if any, is open.
#[derive(Debug, Clone, PartialEq)]
pub enum Editor {
    Closed,
    Creating,
    Editing(Customer),
}

/// Pending delete confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDialog {
    pub target: Customer,
    pub loading: bool,
}

/// The request a submit should send.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRequest {
    Create(Map<String, Value>),
    Update {
        id: DbId,
        payload: Map<String, Value>,
    },
}

/// What the main area shows. Loading, error and table never show together.
#[derive(Debug, PartialEq)]
pub enum Content<'a> {
    Loading,
    Error(&'a str),
    Table(Vec<&'a Customer>),
}

#[derive(Debug, Clone)]
pub struct CustomerView {
    customers: BTreeMap<DbId, Customer>,
    loading: bool,
    error: Option<String>,
    editor: Editor,
    form: CustomerForm,
    form_error: Option<String>,
    form_errors: Option<FormErrors>,
    submitting: bool,
    delete_dialog: Option<DeleteDialog>,
}

impl Default for CustomerView {
    fn default() -> Self {
        Self {
            customers: BTreeMap::new(),
            loading: false,
            error: None,
            editor: Editor::Closed,
            form: CustomerForm::default(),
            form_error: None,
            form_errors: None,
            submitting: false,
            delete_dialog: None,
        }
    }
}

impl CustomerView {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- accessors ----

    /// Cached records in id order.
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn customer(&self, id: DbId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn form(&self) -> &CustomerForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CustomerForm {
        &mut self.form
    }

    /// Inline error from the last failed save.
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Field errors from the last client-side form check.
    pub fn form_errors(&self) -> Option<&FormErrors> {
        self.form_errors.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn delete_dialog(&self) -> Option<&DeleteDialog> {
        self.delete_dialog.as_ref()
    }

    pub fn content(&self) -> Content<'_> {
        if self.loading {
            Content::Loading
        } else if let Some(error) = &self.error {
            Content::Error(error)
        } else {
            Content::Table(self.customers.values().collect())
        }
    }

    // ---- list ----

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn load_succeeded(&mut self, customers: Vec<Customer>) {
        self.customers = customers.into_iter().map(|c| (c.id, c)).collect();
        self.loading = false;
        self.error = None;
    }

    pub fn load_failed(&mut self) {
        self.customers.clear();
        self.loading = false;
        self.error = Some(LOAD_FAILED.to_string());
    }

    // ---- editor ----

    pub fn open_create(&mut self) {
        self.editor = Editor::Creating;
        self.form = CustomerForm::default();
        self.clear_form_feedback();
    }

    pub fn open_edit(&mut self, customer: Customer) {
        self.form = CustomerForm::from(&customer);
        self.editor = Editor::Editing(customer);
        self.clear_form_feedback();
    }

    pub fn close_editor(&mut self) {
        self.editor = Editor::Closed;
        self.clear_form_feedback();
    }

    /// Check the form and mark a submit as in flight.
    ///
    /// Creates send every form value; edits send only the fields that
    /// changed from the record being edited.
    pub fn begin_submit(&mut self) -> ClientResult<SubmitRequest> {
        if self.submitting {
            return Err(ClientError::Busy);
        }

        let request = match &self.editor {
            Editor::Closed => return Err(ClientError::EditorClosed),
            Editor::Creating => SubmitRequest::Create(self.form.to_payload()),
            Editor::Editing(original) => SubmitRequest::Update {
                id: original.id,
                payload: self.form.changes_from(original),
            },
        };

        if let Err(errors) = self.form.validate() {
            self.form_errors = Some(errors.clone());
            return Err(ClientError::InvalidForm(errors));
        }

        self.clear_form_feedback();
        self.submitting = true;
        Ok(request)
    }

    /// Close the editor and sync the cache. Returns `true` when the caller
    /// must re-fetch the list.
    pub fn submit_succeeded(&mut self, customer: Customer, policy: SyncPolicy) -> bool {
        self.submitting = false;
        self.editor = Editor::Closed;
        self.form = CustomerForm::default();
        self.clear_form_feedback();

        match policy {
            SyncPolicy::Patch => {
                self.customers.insert(customer.id, customer);
                false
            }
            SyncPolicy::Refetch => true,
        }
    }

    pub fn submit_failed(&mut self) {
        self.submitting = false;
        self.form_error = Some(SAVE_FAILED.to_string());
    }

    fn clear_form_feedback(&mut self) {
        self.form_error = None;
        self.form_errors = None;
    }

    // ---- delete ----

    pub fn request_delete(&mut self, target: Customer) {
        self.delete_dialog = Some(DeleteDialog {
            target,
            loading: false,
        });
    }

    pub fn cancel_delete(&mut self) {
        if self.delete_dialog.as_ref().is_some_and(|d| !d.loading) {
            self.delete_dialog = None;
        }
    }

    /// Mark the delete as in flight and return the target id.
    pub fn begin_delete(&mut self) -> ClientResult<DbId> {
        let dialog = self
            .delete_dialog
            .as_mut()
            .ok_or(ClientError::NoDeleteTarget)?;
        if dialog.loading {
            return Err(ClientError::Busy);
        }
        dialog.loading = true;
        Ok(dialog.target.id)
    }

    pub fn delete_succeeded(&mut self, id: DbId) {
        self.customers.remove(&id);
        self.delete_dialog = None;
    }

    /// The record stays cached and the dialog stays open.
    pub fn delete_failed(&mut self) {
        if let Some(dialog) = self.delete_dialog.as_mut() {
            dialog.loading = false;
        }
        self.error = Some(DELETE_FAILED.to_string());
    }
}
