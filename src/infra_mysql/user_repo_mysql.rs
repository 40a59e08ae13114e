use super::util::is_dup_key;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<UserRecord, UserRepoError> {
        let user_id: UserId = row
            .try_get("user_id")
            .map_err(|e| UserRepoError::Store(e.to_string()))?;
        let email: String = row
            .try_get("email")
            .map_err(|e| UserRepoError::Store(e.to_string()))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| UserRepoError::Store(e.to_string()))?;
        let refresh_token_version: i64 = row
            .try_get("refresh_token_version")
            .map_err(|e| UserRepoError::Store(e.to_string()))?;

        Ok(UserRecord {
            user_id,
            email,
            password_hash,
            refresh_token_version,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, UserRepoError> {
        let result = sqlx::query(
            r#"
INSERT INTO users (email, password_hash, refresh_token_version)
VALUES (?, ?, 0)
"#,
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                UserRepoError::AlreadyExists
            } else {
                UserRepoError::Store(e.to_string())
            }
        })?;

        Ok(UserId(result.last_insert_id() as i64))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserRepoError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT user_id, email, password_hash, refresh_token_version
FROM users
WHERE email = ?
"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserRepoError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, UserRepoError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT user_id, email, password_hash, refresh_token_version
FROM users
WHERE user_id = ?
"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserRepoError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }
}

#[async_trait::async_trait]
impl RefreshVersionRepo for MySqlUserRepo {
    async fn refresh_version(&self, user_id: UserId) -> Result<i64, RefreshVersionRepoError> {
        let version: Option<i64> =
            sqlx::query_scalar("SELECT refresh_token_version FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RefreshVersionRepoError::Store(format!("query version: {e}")))?;

        version.ok_or(RefreshVersionRepoError::NotFound)
    }

    async fn increment_refresh_version(
        &self,
        user_id: UserId,
    ) -> Result<i64, RefreshVersionRepoError> {
        // LAST_INSERT_ID(expr) makes the server report the new value in the
        // OK packet, so the bump and the read are one statement.
        let result = sqlx::query(
            r#"
UPDATE users
SET refresh_token_version = LAST_INSERT_ID(refresh_token_version + 1)
WHERE user_id = ?
"#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RefreshVersionRepoError::Store(format!("bump version: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(RefreshVersionRepoError::NotFound);
        }

        Ok(result.last_insert_id() as i64)
    }
}
