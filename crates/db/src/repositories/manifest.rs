use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use orcapro_core::domain::manifest::{DeliveryManifest, ManifestId, ManifestStatus};

use super::{now_rfc3339, ManifestRepository, RepositoryError};
use crate::DbPool;

pub struct SqlManifestRepository {
    pool: DbPool,
}

impl SqlManifestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn manifest_from_row(row: &SqliteRow) -> Result<DeliveryManifest, RepositoryError> {
    let status: String = row.try_get("status")?;
    let itens: String = row.try_get("itens")?;

    Ok(DeliveryManifest {
        id: ManifestId(row.try_get("id")?),
        numero: row.try_get("numero")?,
        proposta_id: row.try_get("proposta_id")?,
        proposta_numero: row.try_get("proposta_numero")?,
        cliente_nome: row.try_get("cliente_nome")?,
        data_emissao: row.try_get("data_emissao")?,
        data_entrega: row.try_get("data_entrega")?,
        status: ManifestStatus::parse(&status),
        endereco_entrega: row.try_get("endereco_entrega")?,
        observacoes: row.try_get("observacoes")?,
        itens: serde_json::from_str(&itens).unwrap_or_default(),
        created_date: row.try_get("created_date")?,
        updated_date: row.try_get("updated_date")?,
    })
}

fn itens_json(manifest: &DeliveryManifest) -> String {
    serde_json::to_string(&manifest.itens).unwrap_or_else(|_| "[]".to_string())
}

#[async_trait]
impl ManifestRepository for SqlManifestRepository {
    async fn list(&self) -> Result<Vec<DeliveryManifest>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM romaneios ORDER BY created_date DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(manifest_from_row).collect()
    }

    async fn find_by_id(
        &self,
        id: &ManifestId,
    ) -> Result<Option<DeliveryManifest>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM romaneios WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(manifest_from_row).transpose()
    }

    async fn create(
        &self,
        manifest: DeliveryManifest,
    ) -> Result<DeliveryManifest, RepositoryError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();

        sqlx::query(
            "INSERT INTO romaneios (id, numero, proposta_id, proposta_numero, cliente_nome, \
             data_emissao, data_entrega, status, endereco_entrega, observacoes, itens, \
             created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&id)
        .bind(&manifest.numero)
        .bind(&manifest.proposta_id)
        .bind(&manifest.proposta_numero)
        .bind(&manifest.cliente_nome)
        .bind(&manifest.data_emissao)
        .bind(&manifest.data_entrega)
        .bind(manifest.status.as_str())
        .bind(&manifest.endereco_entrega)
        .bind(&manifest.observacoes)
        .bind(itens_json(&manifest))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&ManifestId(id.clone())).await?.ok_or_else(|| {
            RepositoryError::Decode(format!("manifest `{id}` missing immediately after insert"))
        })
    }

    async fn update(
        &self,
        id: &ManifestId,
        manifest: DeliveryManifest,
    ) -> Result<Option<DeliveryManifest>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE romaneios SET numero = ?1, proposta_id = ?2, proposta_numero = ?3, \
             cliente_nome = ?4, data_emissao = ?5, data_entrega = ?6, status = ?7, \
             endereco_entrega = ?8, observacoes = ?9, itens = ?10, updated_date = ?11 \
             WHERE id = ?12",
        )
        .bind(&manifest.numero)
        .bind(&manifest.proposta_id)
        .bind(&manifest.proposta_numero)
        .bind(&manifest.cliente_nome)
        .bind(&manifest.data_emissao)
        .bind(&manifest.data_entrega)
        .bind(manifest.status.as_str())
        .bind(&manifest.endereco_entrega)
        .bind(&manifest.observacoes)
        .bind(itens_json(&manifest))
        .bind(now_rfc3339())
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: &ManifestId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM romaneios WHERE id = ?1")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use orcapro_core::domain::manifest::{DeliveryManifest, ManifestItem, ManifestStatus};

    use crate::repositories::{ManifestRepository, SqlManifestRepository};
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlManifestRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        SqlManifestRepository::new(pool)
    }

    fn sample_manifest() -> DeliveryManifest {
        DeliveryManifest {
            numero: "ROM-2026-001".to_string(),
            cliente_nome: "Acme S/A".to_string(),
            data_emissao: "2026-08-01".to_string(),
            itens: vec![ManifestItem {
                descricao: "Treliça T2".to_string(),
                quantidade: Decimal::from(8),
                unidade: "UN".to_string(),
                peso: "320kg".to_string(),
                observacao_item: String::new(),
            }],
            ..DeliveryManifest::default()
        }
    }

    #[tokio::test]
    async fn create_then_reload_preserves_items_and_status() {
        let repository = repository().await;
        let created = repository.create(sample_manifest()).await.expect("create");

        let reloaded =
            repository.find_by_id(&created.id).await.expect("find").expect("should exist");
        assert_eq!(reloaded.numero, "ROM-2026-001");
        assert_eq!(reloaded.status, ManifestStatus::Pendente);
        assert_eq!(reloaded.itens.len(), 1);
        assert_eq!(reloaded.itens[0].quantidade, Decimal::from(8));
    }

    #[tokio::test]
    async fn status_updates_persist() {
        let repository = repository().await;
        let created = repository.create(sample_manifest()).await.expect("create");

        let mut changed = created.clone();
        changed.status = ManifestStatus::EmTransito;
        let updated = repository
            .update(&created.id, changed)
            .await
            .expect("update")
            .expect("manifest should exist");
        assert_eq!(updated.status, ManifestStatus::EmTransito);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let repository = repository().await;
        let created = repository.create(sample_manifest()).await.expect("create");
        assert!(repository.delete(&created.id).await.expect("delete"));
        assert!(!repository.delete(&created.id).await.expect("second delete"));
    }
}
