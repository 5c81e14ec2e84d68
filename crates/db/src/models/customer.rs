//! Customer entity model and DTOs.
//!
//! Serialized with camelCase keys, which is the shape clients see on the
//! wire.

use crm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `customers` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
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

/// DTO for creating a new customer. `is_active` defaults to `true`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCustomer {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for a partial update.
///
/// The nullable text fields are `Option<Option<_>>`: the outer `None` means
/// the key was absent (leave unchanged), `Some(None)` means an explicit
/// `null` (clear the column).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCustomer {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub company_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub city: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Marks a key that appeared in the payload, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateCustomer {
    /// Merge the present fields into `customer`, leaving the rest unchanged.
    ///
    /// Timestamps are not touched; callers own `updated_at`.
    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(email) = &self.email {
            customer.email = email.clone();
        }
        merge(&mut customer.first_name, &self.first_name);
        merge(&mut customer.last_name, &self.last_name);
        merge(&mut customer.phone, &self.phone);
        merge(&mut customer.company_name, &self.company_name);
        merge(&mut customer.address, &self.address);
        merge(&mut customer.city, &self.city);
        if let Some(is_active) = self.is_active {
            customer.is_active = is_active;
        }
    }
}

fn merge(target: &mut Option<String>, patch: &Option<Option<String>>) {
    if let Some(value) = patch {
        target.clone_from(value);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn sample() -> Customer {
        let now = Utc::now();
        Customer {
            id: 1,
            email: "a@b.com".to_string(),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
            phone: Some("555".to_string()),
            company_name: None,
            address: None,
            city: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn customer_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["firstName"], "Test");
        assert_eq!(json["isActive"], true);
        assert!(json["companyName"].is_null());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let update: UpdateCustomer =
            serde_json::from_value(json!({"phone": null, "firstName": "Updated"})).unwrap();
        assert_eq!(update.phone, Some(None));
        assert_eq!(update.first_name, Some(Some("Updated".to_string())));
        assert_eq!(update.last_name, None);
    }

    #[test]
    fn update_rejects_unknown_keys() {
        let result = serde_json::from_value::<UpdateCustomer>(json!({"id": 4}));
        assert!(result.is_err());
    }

    #[test]
    fn apply_to_leaves_absent_fields_unchanged() {
        let mut customer = sample();
        let update: UpdateCustomer =
            serde_json::from_value(json!({"firstName": "Updated", "phone": null})).unwrap();
        update.apply_to(&mut customer);

        assert_eq!(customer.first_name.as_deref(), Some("Updated"));
        assert_eq!(customer.last_name.as_deref(), Some("User"));
        assert_eq!(customer.phone, None);
        assert_eq!(customer.email, "a@b.com");
        assert!(customer.is_active);
    }
}
