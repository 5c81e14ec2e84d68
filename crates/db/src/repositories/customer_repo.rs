//! Repository for the `customers` table.

use crm_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, first_name, last_name, phone, company_name, address, city, \
                       is_active, created_at, updated_at";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers \
                (email, first_name, last_name, phone, company_name, address, city, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(&input.company_name)
            .bind(&input.address)
            .bind(&input.city)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a customer by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all customers ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers ORDER BY id");
        sqlx::query_as::<_, Customer>(&query).fetch_all(pool).await
    }

    /// Update a customer. Only fields present in `input` are applied; an
    /// explicit `null` clears a nullable column.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET \
                email = COALESCE($2, email), \
                first_name = CASE WHEN $3 THEN $4 ELSE first_name END, \
                last_name = CASE WHEN $5 THEN $6 ELSE last_name END, \
                phone = CASE WHEN $7 THEN $8 ELSE phone END, \
                company_name = CASE WHEN $9 THEN $10 ELSE company_name END, \
                address = CASE WHEN $11 THEN $12 ELSE address END, \
                city = CASE WHEN $13 THEN $14 ELSE city END, \
                is_active = COALESCE($15, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(input.first_name.is_some())
            .bind(flatten(&input.first_name))
            .bind(input.last_name.is_some())
            .bind(flatten(&input.last_name))
            .bind(input.phone.is_some())
            .bind(flatten(&input.phone))
            .bind(input.company_name.is_some())
            .bind(flatten(&input.company_name))
            .bind(input.address.is_some())
            .bind(flatten(&input.address))
            .bind(input.city.is_some())
            .bind(flatten(&input.city))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a customer, returning the removed row.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("DELETE FROM customers WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

fn flatten(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|value| value.as_deref())
}
