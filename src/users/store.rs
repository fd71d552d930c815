//! sqlx-backed user persistence

use sqlx::SqlitePool;

use super::models::User;
use crate::common::ApiError;

/// User persistence collaborator. Lookups report absence as `None`, not as
/// an error; uniqueness of email is enforced by the schema.
#[derive(Clone, Debug)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn add(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash,
                               profile_picture_url, refresh_token, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_picture_url)
        .bind(&user.refresh_token)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?, password_hash = ?,
                profile_picture_url = ?, refresh_token = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_picture_url)
        .bind(&user.refresh_token)
        .bind(&user.updated_at)
        .bind(&user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
