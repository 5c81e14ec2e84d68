//! Plain-text rendering of the customer views.

use crm_core::types::DbId;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::model::{Customer, CustomerForm};
use crate::state::{Content, CustomerView, DeleteDialog, Editor};

pub const EMPTY_LIST: &str = "No customers found.";
pub const DELETE_WARNING: &str = "This action is permanent and cannot be undone.";

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: DbId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Company")]
    company: String,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl FieldRow {
    fn new(field: &'static str, value: String) -> Self {
        Self { field, value }
    }
}

fn or_na(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// The list area: a loading line, the error, or the table.
pub fn render_list(view: &CustomerView) -> String {
    match view.content() {
        Content::Loading => "Loading...".to_string(),
        Content::Error(message) => format!("Error: {message}"),
        Content::Table(customers) => render_table(&customers),
    }
}

pub fn render_table(customers: &[&Customer]) -> String {
    if customers.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let rows: Vec<CustomerRow> = customers
        .iter()
        .map(|c| CustomerRow {
            id: c.id,
            name: c.display_name(),
            email: c.email.clone(),
            phone: or_na(&c.phone),
            company: or_na(&c.company_name),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Every field of a single record.
pub fn render_detail(customer: &Customer) -> String {
    let rows = vec![
        FieldRow::new("ID", customer.id.to_string()),
        FieldRow::new("Email", customer.email.clone()),
        FieldRow::new("First Name", or_empty(&customer.first_name)),
        FieldRow::new("Last Name", or_empty(&customer.last_name)),
        FieldRow::new("Phone", or_empty(&customer.phone)),
        FieldRow::new("Company Name", or_empty(&customer.company_name)),
        FieldRow::new("Address", or_empty(&customer.address)),
        FieldRow::new("City", or_empty(&customer.city)),
        FieldRow::new("Is Active", customer.is_active.to_string()),
        FieldRow::new("Created", customer.created_at.to_rfc3339()),
        FieldRow::new("Updated", customer.updated_at.to_rfc3339()),
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn editor_title(editor: &Editor) -> Option<String> {
    match editor {
        Editor::Closed => None,
        Editor::Creating => Some("Create New Customer".to_string()),
        Editor::Editing(customer) => Some(format!("Edit {}", customer.email)),
    }
}

pub fn submit_label(editor: &Editor) -> Option<&'static str> {
    match editor {
        Editor::Closed => None,
        Editor::Creating => Some("Create Customer"),
        Editor::Editing(_) => Some("Update Customer"),
    }
}

/// The open form with its title, inline error and submit label.
pub fn render_editor(view: &CustomerView) -> Option<String> {
    let title = editor_title(view.editor())?;
    let label = submit_label(view.editor())?;
    let form: &CustomerForm = view.form();

    let mut out = format!("{title}\n");
    if let Some(error) = view.form_error() {
        out.push_str(&format!("Error: {error}\n"));
    }
    let rows = vec![
        FieldRow::new("Email", form.email.clone()),
        FieldRow::new("First Name", form.first_name.clone()),
        FieldRow::new("Last Name", form.last_name.clone()),
        FieldRow::new("Phone", form.phone.clone()),
        FieldRow::new("Company Name", form.company_name.clone()),
        FieldRow::new("Address", form.address.clone()),
        FieldRow::new("City", form.city.clone()),
        FieldRow::new("Is Active", form.is_active.to_string()),
    ];
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push('\n');
    if let Some(errors) = view.form_errors() {
        for error in &errors.0 {
            out.push_str(&format!("{}: {}\n", error.field, error.message));
        }
    }
    out.push_str(&format!("[{label}]"));
    Some(out)
}

pub fn delete_prompt(dialog: &DeleteDialog) -> String {
    let name = if dialog.target.email.is_empty() {
        "this customer"
    } else {
        dialog.target.email.as_str()
    };
    format!("Are you sure you want to delete {name}?")
}

/// Prompt plus warning for the open delete dialog.
pub fn render_delete_dialog(view: &CustomerView) -> Option<String> {
    view.delete_dialog()
        .map(|dialog| format!("{}\n{DELETE_WARNING}", delete_prompt(dialog)))
}
