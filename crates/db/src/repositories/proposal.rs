use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use orcapro_core::domain::proposal::{ProposalId, ProposalRecord, ProposalStatus};

use super::{now_rfc3339, ProposalRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProposalRepository {
    pool: DbPool,
}

impl SqlProposalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &SqliteRow) -> Result<ProposalRecord, RepositoryError> {
    let valor_total: String = row.try_get("valor_total")?;
    let status: String = row.try_get("status")?;
    let itens: String = row.try_get("itens")?;

    Ok(ProposalRecord {
        id: ProposalId(row.try_get("id")?),
        numero: row.try_get("numero")?,
        revisao: row.try_get("revisao")?,
        cliente_id: row.try_get("cliente_id")?,
        cliente_nome: row.try_get("cliente_nome")?,
        contato: row.try_get("contato")?,
        referencia: row.try_get("referencia")?,
        titulo: row.try_get("titulo")?,
        tipo_fornecimento: row.try_get("tipo_fornecimento")?,
        // Stored as text; anything unparseable counts as zero, the same
        // degradation the totals path applies.
        valor_total: valor_total.parse::<Decimal>().unwrap_or(Decimal::ZERO),
        status: ProposalStatus::parse(&status),
        data_proposta: row.try_get("data_proposta")?,
        validade_texto: row.try_get("validade_texto")?,
        condicoes_pagamento: row.try_get("condicoes_pagamento")?,
        prazo_entrega: row.try_get("prazo_entrega")?,
        observacoes: row.try_get("observacoes")?,
        reajuste: row.try_get("reajuste")?,
        impostos: row.try_get("impostos")?,
        garantia: row.try_get("garantia")?,
        escopo: row.try_get("escopo")?,
        fora_escopo: row.try_get("fora_escopo")?,
        ensaios: row.try_get("ensaios")?,
        tratamento: row.try_get("tratamento")?,
        databook: row.try_get("databook")?,
        transporte: row.try_get("transporte")?,
        documentos: row.try_get("documentos")?,
        documentos_data: row.try_get("documentos_data")?,
        itens: serde_json::from_str(&itens).unwrap_or_default(),
        created_date: row.try_get("created_date")?,
        updated_date: row.try_get("updated_date")?,
    })
}

fn itens_json(record: &ProposalRecord) -> String {
    serde_json::to_string(&record.itens).unwrap_or_else(|_| "[]".to_string())
}

#[async_trait]
impl ProposalRepository for SqlProposalRepository {
    async fn list(&self) -> Result<Vec<ProposalRecord>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM propostas ORDER BY created_date DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<ProposalRecord>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM propostas WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn list_numbers(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT numero FROM propostas").fetch_all(&self.pool).await?;
        Ok(rows.iter().map(|row| row.get::<String, _>("numero")).collect())
    }

    async fn create(&self, record: ProposalRecord) -> Result<ProposalRecord, RepositoryError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();

        sqlx::query(
            "INSERT INTO propostas (id, numero, revisao, cliente_id, cliente_nome, contato, \
             referencia, titulo, tipo_fornecimento, valor_total, status, data_proposta, \
             validade_texto, condicoes_pagamento, prazo_entrega, observacoes, reajuste, impostos, \
             garantia, escopo, fora_escopo, ensaios, tratamento, databook, transporte, documentos, \
             documentos_data, itens, created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, \
             ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30)",
        )
        .bind(&id)
        .bind(&record.numero)
        .bind(&record.revisao)
        .bind(&record.cliente_id)
        .bind(&record.cliente_nome)
        .bind(&record.contato)
        .bind(&record.referencia)
        .bind(&record.titulo)
        .bind(&record.tipo_fornecimento)
        .bind(record.valor_total.to_string())
        .bind(record.status.as_str())
        .bind(&record.data_proposta)
        .bind(&record.validade_texto)
        .bind(&record.condicoes_pagamento)
        .bind(&record.prazo_entrega)
        .bind(&record.observacoes)
        .bind(&record.reajuste)
        .bind(&record.impostos)
        .bind(&record.garantia)
        .bind(&record.escopo)
        .bind(&record.fora_escopo)
        .bind(&record.ensaios)
        .bind(&record.tratamento)
        .bind(&record.databook)
        .bind(&record.transporte)
        .bind(&record.documentos)
        .bind(&record.documentos_data)
        .bind(itens_json(&record))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&ProposalId(id.clone())).await?.ok_or_else(|| {
            RepositoryError::Decode(format!("proposal `{id}` missing immediately after insert"))
        })
    }

    async fn update(
        &self,
        id: &ProposalId,
        record: ProposalRecord,
    ) -> Result<Option<ProposalRecord>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE propostas SET numero = ?1, revisao = ?2, cliente_id = ?3, cliente_nome = ?4, \
             contato = ?5, referencia = ?6, titulo = ?7, tipo_fornecimento = ?8, valor_total = ?9, \
             status = ?10, data_proposta = ?11, validade_texto = ?12, condicoes_pagamento = ?13, \
             prazo_entrega = ?14, observacoes = ?15, reajuste = ?16, impostos = ?17, \
             garantia = ?18, escopo = ?19, fora_escopo = ?20, ensaios = ?21, tratamento = ?22, \
             databook = ?23, transporte = ?24, documentos = ?25, documentos_data = ?26, \
             itens = ?27, updated_date = ?28 WHERE id = ?29",
        )
        .bind(&record.numero)
        .bind(&record.revisao)
        .bind(&record.cliente_id)
        .bind(&record.cliente_nome)
        .bind(&record.contato)
        .bind(&record.referencia)
        .bind(&record.titulo)
        .bind(&record.tipo_fornecimento)
        .bind(record.valor_total.to_string())
        .bind(record.status.as_str())
        .bind(&record.data_proposta)
        .bind(&record.validade_texto)
        .bind(&record.condicoes_pagamento)
        .bind(&record.prazo_entrega)
        .bind(&record.observacoes)
        .bind(&record.reajuste)
        .bind(&record.impostos)
        .bind(&record.garantia)
        .bind(&record.escopo)
        .bind(&record.fora_escopo)
        .bind(&record.ensaios)
        .bind(&record.tratamento)
        .bind(&record.databook)
        .bind(&record.transporte)
        .bind(&record.documentos)
        .bind(&record.documentos_data)
        .bind(itens_json(&record))
        .bind(now_rfc3339())
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: &ProposalId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM propostas WHERE id = ?1").bind(&id.0).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use orcapro_core::domain::proposal::{LineItem, ProposalRecord, ProposalStatus};

    use crate::repositories::{ProposalRepository, SqlProposalRepository};
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlProposalRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        SqlProposalRepository::new(pool)
    }

    fn sample_record() -> ProposalRecord {
        ProposalRecord {
            numero: "260001".to_string(),
            revisao: "1.0".to_string(),
            titulo: "Fabricação de estrutura metálica".to_string(),
            cliente_nome: "Acme S/A".to_string(),
            valor_total: "11760.00".parse().unwrap(),
            escopo: "Inspeção Dimensional;\nIçamento próprio;".to_string(),
            itens: vec![LineItem {
                descricao: "Viga W150".to_string(),
                un: "Kg".to_string(),
                qtd: Decimal::from(1200),
                valor: "9.80".parse().unwrap(),
            }],
            ..ProposalRecord::default()
        }
    }

    #[tokio::test]
    async fn create_then_reload_round_trips_every_text_column() {
        let repository = repository().await;
        let created = repository.create(sample_record()).await.expect("create");

        assert!(!created.id.0.is_empty());
        assert!(!created.created_date.is_empty());

        let reloaded =
            repository.find_by_id(&created.id).await.expect("find").expect("should exist");
        assert_eq!(reloaded.numero, "260001");
        assert_eq!(reloaded.escopo, "Inspeção Dimensional;\nIçamento próprio;");
        assert_eq!(reloaded.itens.len(), 1);
        assert_eq!(reloaded.valor_total, "11760.00".parse::<Decimal>().unwrap());
        assert_eq!(reloaded.status, ProposalStatus::Rascunho);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_bumps_updated_date() {
        let repository = repository().await;
        let created = repository.create(sample_record()).await.expect("create");

        let mut changed = created.clone();
        changed.revisao = "2.0".to_string();
        changed.status = ProposalStatus::Enviada;

        let updated = repository
            .update(&created.id, changed)
            .await
            .expect("update")
            .expect("record should exist");
        assert_eq!(updated.revisao, "2.0");
        assert_eq!(updated.status, ProposalStatus::Enviada);
        assert_eq!(updated.created_date, created.created_date);
    }

    #[tokio::test]
    async fn update_of_missing_record_returns_none() {
        let repository = repository().await;
        let missing = repository
            .update(&orcapro_core::domain::proposal::ProposalId("nope".to_string()), sample_record())
            .await
            .expect("update call");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn list_numbers_feeds_the_sequencer() {
        let repository = repository().await;
        repository.create(sample_record()).await.expect("create");
        let mut second = sample_record();
        second.numero = "260007".to_string();
        repository.create(second).await.expect("create");

        let mut numbers = repository.list_numbers().await.expect("list numbers");
        numbers.sort();
        assert_eq!(numbers, vec!["260001".to_string(), "260007".to_string()]);
    }

    #[tokio::test]
    async fn delete_is_unconditional_and_reports_outcome() {
        let repository = repository().await;
        let created = repository.create(sample_record()).await.expect("create");

        assert!(repository.delete(&created.id).await.expect("delete"));
        assert!(!repository.delete(&created.id).await.expect("second delete"));
        assert!(repository.find_by_id(&created.id).await.expect("find").is_none());
    }
}
