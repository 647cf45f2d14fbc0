use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use orcapro_core::domain::user::{Perfil, User, UserId};

use super::{map_insert_error, now_rfc3339, RepositoryError, UserRepository};
use crate::DbPool;

const DUPLICATE_LOGIN: &str = "login already in use";

/// Public user shape plus the stored password digest, for login checks.
#[derive(Clone, Debug)]
pub struct StoredCredentials {
    pub user: User,
    pub senha_hash: String,
}

pub struct SqlUserRepository {
    pool: DbPool,
}

impl SqlUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, RepositoryError> {
    let perfil: String = row.try_get("perfil")?;
    Ok(User {
        id: UserId(row.try_get("id")?),
        nome: row.try_get("nome")?,
        login: row.try_get("login")?,
        perfil: Perfil::parse(&perfil),
        ativo: row.try_get::<i64, _>("ativo")? != 0,
        created_date: row.try_get("created_date")?,
    })
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, nome, login, perfil, ativo, created_date FROM usuarios \
             ORDER BY created_date ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, nome, login, perfil, ativo, created_date FROM usuarios WHERE id = ?1",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_credentials(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM usuarios WHERE login = ?1")
            .bind(login.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let user = user_from_row(&row)?;
        let senha_hash: String = row.try_get("senha_hash")?;
        Ok(Some(StoredCredentials { user, senha_hash }))
    }

    async fn create(&self, user: User, senha_hash: String) -> Result<User, RepositoryError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();

        sqlx::query(
            "INSERT INTO usuarios (id, nome, login, senha_hash, perfil, ativo, created_date, \
             updated_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&id)
        .bind(user.nome.trim())
        .bind(user.login.trim().to_lowercase())
        .bind(&senha_hash)
        .bind(user.perfil.as_str())
        .bind(user.ativo as i64)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|error| map_insert_error(error, DUPLICATE_LOGIN))?;

        self.find_by_id(&UserId(id.clone())).await?.ok_or_else(|| {
            RepositoryError::Decode(format!("user `{id}` missing immediately after insert"))
        })
    }

    async fn update(
        &self,
        id: &UserId,
        user: User,
        senha_hash: Option<String>,
    ) -> Result<Option<User>, RepositoryError> {
        // A blank password on the way in keeps the stored digest.
        let result = match senha_hash {
            Some(senha_hash) => sqlx::query(
                "UPDATE usuarios SET nome = ?1, login = ?2, senha_hash = ?3, perfil = ?4, \
                 ativo = ?5, updated_date = ?6 WHERE id = ?7",
            )
            .bind(user.nome.trim())
            .bind(user.login.trim().to_lowercase())
            .bind(&senha_hash)
            .bind(user.perfil.as_str())
            .bind(user.ativo as i64)
            .bind(now_rfc3339())
            .bind(&id.0)
            .execute(&self.pool)
            .await,
            None => sqlx::query(
                "UPDATE usuarios SET nome = ?1, login = ?2, perfil = ?3, ativo = ?4, \
                 updated_date = ?5 WHERE id = ?6",
            )
            .bind(user.nome.trim())
            .bind(user.login.trim().to_lowercase())
            .bind(user.perfil.as_str())
            .bind(user.ativo as i64)
            .bind(now_rfc3339())
            .bind(&id.0)
            .execute(&self.pool)
            .await,
        }
        .map_err(|error| map_insert_error(error, DUPLICATE_LOGIN))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM usuarios WHERE id = ?1").bind(&id.0).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
