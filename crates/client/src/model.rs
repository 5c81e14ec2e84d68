//! Customer record as the client sees it, and the editor's form values.

use std::fmt;
use std::sync::LazyLock;

use crm_core::customer::{
    FIELD_ADDRESS, FIELD_CITY, FIELD_COMPANY_NAME, FIELD_EMAIL, FIELD_FIRST_NAME,
    FIELD_IS_ACTIVE, FIELD_LAST_NAME, FIELD_PHONE,
};
use crm_core::types::{DbId, Timestamp};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loose email shape checked before a request is sent. The server applies
/// the authoritative check.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid regex"));

/// A customer record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Customer {
    /// `"<first> <last>"`, with missing parts rendered empty.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
    }
}

/// Values held by the create/edit form. Text inputs never hold `null`:
/// missing values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub company_name: String,
    pub address: String,
    pub city: String,
    pub is_active: bool,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            company_name: String::new(),
            address: String::new(),
            city: String::new(),
            is_active: true,
        }
    }
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            email: customer.email.clone(),
            first_name: text(&customer.first_name),
            last_name: text(&customer.last_name),
            phone: text(&customer.phone),
            company_name: text(&customer.company_name),
            address: text(&customer.address),
            city: text(&customer.city),
            is_active: customer.is_active,
        }
    }
}

impl CustomerForm {
    /// Client-side checks run before submitting.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let message = if self.email.trim().is_empty() {
            Some("Email is required")
        } else if !EMAIL_SHAPE.is_match(&self.email) {
            Some("Invalid email")
        } else {
            None
        };

        match message {
            Some(message) => Err(FormErrors(vec![FieldError {
                field: FIELD_EMAIL,
                message: message.to_string(),
            }])),
            None => Ok(()),
        }
    }

    /// Every form value, keyed by wire field name.
    pub fn to_payload(&self) -> Map<String, Value> {
        self.entries()
            .into_iter()
            .map(|(field, value)| (field.to_string(), value))
            .collect()
    }

    /// Only the values that differ from `original`, keyed by wire field name.
    ///
    /// Comparison is against the form rendering of `original`, so a `null`
    /// field left blank is not sent.
    pub fn changes_from(&self, original: &Customer) -> Map<String, Value> {
        let before: Map<String, Value> = CustomerForm::from(original).to_payload();
        self.to_payload()
            .into_iter()
            .filter(|(field, value)| before.get(field) != Some(value))
            .collect()
    }

    fn entries(&self) -> [(&'static str, Value); 8] {
        [
            (FIELD_EMAIL, Value::from(self.email.clone())),
            (FIELD_FIRST_NAME, Value::from(self.first_name.clone())),
            (FIELD_LAST_NAME, Value::from(self.last_name.clone())),
            (FIELD_PHONE, Value::from(self.phone.clone())),
            (FIELD_COMPANY_NAME, Value::from(self.company_name.clone())),
            (FIELD_ADDRESS, Value::from(self.address.clone())),
            (FIELD_CITY, Value::from(self.city.clone())),
            (FIELD_IS_ACTIVE, Value::from(self.is_active)),
        ]
    }
}

/// A single form field that failed a client-side check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All client-side form errors from one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}
