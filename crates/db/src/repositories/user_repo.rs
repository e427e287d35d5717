//! Repository for the `users` table.

use ingetech_core::audience::AudienceFilter;
use ingetech_core::roles::DEFAULT_CUSTOMER_TYPE;
use ingetech_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, Recipient, UpdateUser, User, UserSearch};
use crate::repositories::lookup_repo::UserTypeRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, identification, username, email, password_hash, full_name, \
                       phone, address, birth_date, province_id, user_type_id, \
                       last_login_at, created_at, updated_at";

const RECIPIENT_COLUMNS: &str = "id, email, full_name, phone";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (identification, username, email, password_hash, full_name, \
                                phone, address, birth_date, province_id, user_type_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.identification)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.birth_date)
            .bind(input.province_id)
            .bind(input.user_type_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users matching the optional filters, ordered by full name.
    pub async fn search(pool: &PgPool, params: &UserSearch) -> Result<Vec<User>, sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        let term = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if term.is_some() {
            conditions.push(format!(
                "(full_name ILIKE ${bind_idx} OR email ILIKE ${bind_idx} \
                  OR username ILIKE ${bind_idx} OR identification ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.province_id.is_some() {
            conditions.push(format!("province_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.user_type_id.is_some() {
            conditions.push(format!("user_type_id = ${bind_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT {COLUMNS} FROM users {where_clause} ORDER BY full_name ASC");
        let mut q = sqlx::query_as::<_, User>(&query);

        if let Some(term) = term {
            q = q.bind(format!("%{term}%"));
        }
        if let Some(province_id) = params.province_id {
            q = q.bind(province_id);
        }
        if let Some(user_type_id) = params.user_type_id {
            q = q.bind(user_type_id);
        }

        q.fetch_all(pool).await
    }

    /// Update a user. `None` keeps the current value for required columns;
    /// `phone`, `address` and `birth_date` are written as given.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                identification = COALESCE($2, identification),
                username = COALESCE($3, username),
                email = COALESCE($4, email),
                full_name = COALESCE($5, full_name),
                phone = $6,
                address = $7,
                birth_date = $8,
                province_id = COALESCE($9, province_id),
                user_type_id = COALESCE($10, user_type_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.identification)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.birth_date)
            .bind(input.province_id)
            .bind(input.user_type_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `last_login_at` with the current time.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a user. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign key violation while the user is still referenced
    /// by restricting rows.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve the recipients a communication's audience filter selects.
    ///
    /// [`AudienceFilter::DefaultCustomers`] looks the customer type up by
    /// name; when it is missing no type restriction is applied.
    pub async fn list_recipients(
        pool: &PgPool,
        filter: &AudienceFilter,
    ) -> Result<Vec<Recipient>, sqlx::Error> {
        let base = format!("SELECT {RECIPIENT_COLUMNS} FROM users");
        let order = "ORDER BY id ASC";

        match filter {
            AudienceFilter::DefaultCustomers => {
                match UserTypeRepo::find_id_by_name(pool, DEFAULT_CUSTOMER_TYPE).await? {
                    Some(type_id) => {
                        let query = format!("{base} WHERE user_type_id = $1 {order}");
                        sqlx::query_as::<_, Recipient>(&query)
                            .bind(type_id)
                            .fetch_all(pool)
                            .await
                    }
                    None => {
                        tracing::warn!(
                            type_name = DEFAULT_CUSTOMER_TYPE,
                            "Default customer type missing, targeting every user"
                        );
                        let query = format!("{base} {order}");
                        sqlx::query_as::<_, Recipient>(&query).fetch_all(pool).await
                    }
                }
            }
            AudienceFilter::Provinces(provinces) => {
                let query = format!("{base} WHERE province_id = ANY($1) {order}");
                sqlx::query_as::<_, Recipient>(&query)
                    .bind(provinces)
                    .fetch_all(pool)
                    .await
            }
            AudienceFilter::UserTypes(user_types) => {
                let query = format!("{base} WHERE user_type_id = ANY($1) {order}");
                sqlx::query_as::<_, Recipient>(&query)
                    .bind(user_types)
                    .fetch_all(pool)
                    .await
            }
            AudienceFilter::ProvincesAndUserTypes {
                provinces,
                user_types,
            } => {
                let query = format!(
                    "{base} WHERE province_id = ANY($1) AND user_type_id = ANY($2) {order}"
                );
                sqlx::query_as::<_, Recipient>(&query)
                    .bind(provinces)
                    .bind(user_types)
                    .fetch_all(pool)
                    .await
            }
            AudienceFilter::Everyone => {
                let query = format!("{base} {order}");
                sqlx::query_as::<_, Recipient>(&query).fetch_all(pool).await
            }
        }
    }
}
