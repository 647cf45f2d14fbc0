use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use orcapro_core::domain::client::{Client, ClientId};

use super::{now_rfc3339, ClientRepository, RepositoryError};
use crate::DbPool;

pub struct SqlClientRepository {
    pool: DbPool,
}

impl SqlClientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn client_from_row(row: &SqliteRow) -> Result<Client, RepositoryError> {
    Ok(Client {
        id: ClientId(row.try_get("id")?),
        razao_social: row.try_get("razao_social")?,
        nome_fantasia: row.try_get("nome_fantasia")?,
        cnpj: row.try_get("cnpj")?,
        email: row.try_get("email")?,
        telefone: row.try_get("telefone")?,
        endereco: row.try_get("endereco")?,
        cidade: row.try_get("cidade")?,
        estado: row.try_get("estado")?,
        contato_principal: row.try_get("contato_principal")?,
        aprovado: row.try_get("aprovado")?,
        created_date: row.try_get("created_date")?,
        updated_date: row.try_get("updated_date")?,
    })
}

#[async_trait]
impl ClientRepository for SqlClientRepository {
    async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM clientes ORDER BY created_date DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(client_from_row).collect()
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM clientes WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(client_from_row).transpose()
    }

    async fn create(&self, client: Client) -> Result<Client, RepositoryError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();

        sqlx::query(
            "INSERT INTO clientes (id, razao_social, nome_fantasia, cnpj, email, telefone, \
             endereco, cidade, estado, contato_principal, aprovado, created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&id)
        .bind(&client.razao_social)
        .bind(&client.nome_fantasia)
        .bind(&client.cnpj)
        .bind(&client.email)
        .bind(&client.telefone)
        .bind(&client.endereco)
        .bind(&client.cidade)
        .bind(&client.estado)
        .bind(&client.contato_principal)
        .bind(client.aprovado)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&ClientId(id.clone())).await?.ok_or_else(|| {
            RepositoryError::Decode(format!("client `{id}` missing immediately after insert"))
        })
    }

    async fn update(
        &self,
        id: &ClientId,
        client: Client,
    ) -> Result<Option<Client>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE clientes SET razao_social = ?1, nome_fantasia = ?2, cnpj = ?3, email = ?4, \
             telefone = ?5, endereco = ?6, cidade = ?7, estado = ?8, contato_principal = ?9, \
             aprovado = ?10, updated_date = ?11 WHERE id = ?12",
        )
        .bind(&client.razao_social)
        .bind(&client.nome_fantasia)
        .bind(&client.cnpj)
        .bind(&client.email)
        .bind(&client.telefone)
        .bind(&client.endereco)
        .bind(&client.cidade)
        .bind(&client.estado)
        .bind(&client.contato_principal)
        .bind(client.aprovado)
        .bind(now_rfc3339())
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: &ClientId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM clientes WHERE id = ?1").bind(&id.0).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use orcapro_core::domain::client::Client;

    use crate::repositories::{ClientRepository, SqlClientRepository};
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlClientRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        SqlClientRepository::new(pool)
    }

    fn sample_client() -> Client {
        Client {
            razao_social: "Acme Estruturas S/A".to_string(),
            nome_fantasia: "Acme".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            email: "contato@acme.com.br".to_string(),
            cidade: "Três Lagoas".to_string(),
            estado: "MS".to_string(),
            ..Client::default()
        }
    }

    #[tokio::test]
    async fn create_preserves_pending_approval_as_null() {
        let repository = repository().await;
        let created = repository.create(sample_client()).await.expect("create");
        assert_eq!(created.aprovado, None);
        assert_eq!(created.razao_social, "Acme Estruturas S/A");
    }

    #[tokio::test]
    async fn approval_toggles_through_all_three_states() {
        let repository = repository().await;
        let created = repository.create(sample_client()).await.expect("create");

        for state in [Some(true), Some(false), None] {
            let mut changed = created.clone();
            changed.aprovado = state;
            let updated = repository
                .update(&created.id, changed)
                .await
                .expect("update")
                .expect("client should exist");
            assert_eq!(updated.aprovado, state);
        }
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let repository = repository().await;
        let created = repository.create(sample_client()).await.expect("create");
        assert!(repository.delete(&created.id).await.expect("delete"));
        assert!(repository.find_by_id(&created.id).await.expect("find").is_none());
    }
}
