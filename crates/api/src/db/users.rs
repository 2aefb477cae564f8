//! User repository for database operations.
//!
//! Users support dual-key lookup: the [`UserIdentifier`] decided at the HTTP
//! boundary picks either the primary key or the `cognito_user_id` column.
//! Exactly one lookup path runs per call.

use sqlx::{PgPool, Postgres, QueryBuilder};

use rare_thread_core::{AddressId, Email, UserId, UserIdentifier};

use super::RepositoryError;
use crate::models::{Address, NewAddress, NewUser, User, UserPatch};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    cognito_user_id: Option<String>,
    email: Email,
    name: Option<String>,
    phone: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    fn into_user(self, addresses: Vec<Address>) -> User {
        User {
            id: self.id,
            cognito_user_id: self.cognito_user_id,
            email: self.email,
            name: self.name,
            phone: self.phone,
            addresses,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    street: String,
    city: String,
    state: String,
    zip: String,
    country: String,
    is_default: bool,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            street: row.street,
            city: row.city,
            state: row.state,
            zip: row.zip,
            country: row.country,
            is_default: row.is_default,
        }
    }
}

const USER_COLUMNS: &str = "id, cognito_user_id, email, name, phone, created_at, updated_at";

/// Repository for user and address database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by surrogate id or external identity id, with addresses.
    ///
    /// Returns `Ok(None)` if neither lookup matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, identifier: &UserIdentifier) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = match identifier {
            UserIdentifier::Id(id) => {
                sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                    .bind(id)
                    .fetch_optional(self.pool)
                    .await?
            }
            UserIdentifier::Cognito(external) => {
                sqlx::query_as(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE cognito_user_id = $1"
                ))
                .bind(external)
                .fetch_optional(self.pool)
                .await?
            }
        };

        let Some(row) = row else {
            return Ok(None);
        };

        let addresses = self.addresses_for(row.id).await?;
        Ok(Some(row.into_user(addresses)))
    }

    /// Get a user by email address, with addresses.
    ///
    /// Returns `Ok(None)` if no user matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let addresses = self.addresses_for(row.id).await?;
        Ok(Some(row.into_user(addresses)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email (or external id) is
    /// already taken. Returns `RepositoryError::Database` for other database
    /// errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            r"
            INSERT INTO users (cognito_user_id, email, name, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&new_user.cognito_user_id)
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("user already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into_user(Vec::new()))
    }

    /// Apply a partial update to a user's scalar fields.
    ///
    /// The identifier decides whether the `WHERE` clause targets the primary
    /// key or the external id column. Returns `false` when the patch is
    /// empty or no user matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an email update collides with
    /// an existing user. Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn update(
        &self,
        identifier: &UserIdentifier,
        patch: &UserPatch,
    ) -> Result<bool, RepositoryError> {
        if patch.is_empty() {
            return Ok(false);
        }

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE users SET ");
        let mut fields = query.separated(", ");
        if let Some(cognito_user_id) = &patch.cognito_user_id {
            fields
                .push("cognito_user_id = ")
                .push_bind_unseparated(cognito_user_id);
        }
        if let Some(email) = &patch.email {
            fields.push("email = ").push_bind_unseparated(email);
        }
        if let Some(name) = &patch.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(phone) = &patch.phone {
            fields.push("phone = ").push_bind_unseparated(phone);
        }
        fields.push("updated_at = CURRENT_TIMESTAMP");
        match identifier {
            UserIdentifier::Id(id) => {
                query.push(" WHERE id = ").push_bind(id);
            }
            UserIdentifier::Cognito(external) => {
                query.push(" WHERE cognito_user_id = ").push_bind(external);
            }
        }

        let result = query.build().execute(self.pool).await.map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("user already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Add an address to a user, maintaining the single-default invariant.
    ///
    /// Runs in one transaction: resolve the identifier to the internal user
    /// id, clear `is_default` on the user's existing addresses when the new
    /// one is the default, then insert. Concurrent sessions are not
    /// serialized beyond the transaction itself; that looseness is accepted
    /// at this scale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if an external identifier
    /// resolves to no user. Returns `RepositoryError::Database` for database
    /// errors, including an unknown surrogate id surfacing as a foreign-key
    /// violation on insert.
    pub async fn add_address(
        &self,
        identifier: &UserIdentifier,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_id = match identifier {
            UserIdentifier::Id(id) => *id,
            UserIdentifier::Cognito(external) => {
                let row: Option<(UserId,)> =
                    sqlx::query_as("SELECT id FROM users WHERE cognito_user_id = $1")
                        .bind(external)
                        .fetch_optional(&mut *tx)
                        .await?;
                row.ok_or(RepositoryError::NotFound)?.0
            }
        };

        if address.is_default {
            sqlx::query("UPDATE user_addresses SET is_default = FALSE WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let row: AddressRow = sqlx::query_as(
            r"
            INSERT INTO user_addresses (user_id, street, city, state, zip, country, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, street, city, state, zip, country, is_default
            ",
        )
        .bind(user_id)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip)
        .bind(&address.country)
        .bind(address.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Fetch a user's addresses, default first, then oldest first.
    async fn addresses_for(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, street, city, state, zip, country, is_default
            FROM user_addresses
            WHERE user_id = $1
            ORDER BY is_default DESC, created_at ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }
}
