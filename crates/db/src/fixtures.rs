//! Deterministic demo fixtures: one admin account, one customer, and a
//! flattened sample proposal, safe to re-run against a seeded database.

use rust_decimal::Decimal;

use orcapro_core::codec;
use orcapro_core::domain::client::Client;
use orcapro_core::domain::proposal::{ChecklistField, LineItem, ProposalForm};
use orcapro_core::domain::user::{Perfil, User};
use orcapro_core::sequence::{next_proposal_number, NumberingOptions};

use crate::repositories::{
    ClientRepository, ProposalRepository, RepositoryError, SqlClientRepository,
    SqlProposalRepository, SqlUserRepository, UserRepository,
};
use crate::DbPool;

pub const SEED_ADMIN_LOGIN: &str = "admin";
pub const SEED_ADMIN_PASSWORD: &str = "mudar-na-primeira-entrada";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub usuarios: u32,
    pub clientes: u32,
    pub propostas: u32,
}

pub async fn seed_baseline(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
    let users = SqlUserRepository::new(pool.clone());
    let clients = SqlClientRepository::new(pool.clone());
    let proposals = SqlProposalRepository::new(pool.clone());

    let mut summary = SeedSummary::default();

    if users.find_credentials(SEED_ADMIN_LOGIN).await?.is_none() {
        let admin = User {
            nome: "Administrador".to_string(),
            login: SEED_ADMIN_LOGIN.to_string(),
            perfil: Perfil::Admin,
            ativo: true,
            ..User::default()
        };
        users.create(admin, orcapro_core::hash_password(SEED_ADMIN_PASSWORD)).await?;
        summary.usuarios += 1;
    }

    let existing_clients = clients.list().await?;
    let client_id = match existing_clients
        .iter()
        .find(|client| client.razao_social == "Acme Estruturas S/A")
    {
        Some(client) => client.id.clone(),
        None => {
            let created = clients
                .create(Client {
                    razao_social: "Acme Estruturas S/A".to_string(),
                    nome_fantasia: "Acme".to_string(),
                    cnpj: "12.345.678/0001-90".to_string(),
                    email: "compras@acme.com.br".to_string(),
                    telefone: "(67) 3333-1000".to_string(),
                    cidade: "Três Lagoas".to_string(),
                    estado: "MS".to_string(),
                    contato_principal: "Sr. Ribeiro".to_string(),
                    aprovado: Some(true),
                    ..Client::default()
                })
                .await?;
            summary.clientes += 1;
            created.id
        }
    };

    let numbers = proposals.list_numbers().await?;
    if numbers.is_empty() {
        let mut form = ProposalForm {
            numero: next_proposal_number(&numbers, &NumberingOptions::default()),
            cliente_id: Some(client_id.0.clone()),
            cliente_nome: "Acme Estruturas S/A".to_string(),
            contato: "Sr. Ribeiro".to_string(),
            referencia: "Projeto Galpão 2".to_string(),
            data_proposta: "2026-08-01".to_string(),
            titulo: "Fabricação de estrutura metálica".to_string(),
            escopo: ChecklistField {
                selected: vec![
                    codec::ESCOPO_OPTIONS[0].to_string(),
                    codec::ESCOPO_OPTIONS[2].to_string(),
                ],
                extra: vec![],
            },
            itens: vec![
                LineItem {
                    descricao: "Viga W150".to_string(),
                    un: "Kg".to_string(),
                    qtd: Decimal::from(1200),
                    valor: "9.80".parse().unwrap_or(Decimal::ZERO),
                },
                LineItem {
                    descricao: "Guarda-corpo padrão NR-12".to_string(),
                    un: "m".to_string(),
                    qtd: Decimal::from(40),
                    valor: "310.00".parse().unwrap_or(Decimal::ZERO),
                },
            ],
            ..ProposalForm::default()
        };
        form.recompute_total();
        proposals.create(codec::flatten_form(&form)).await?;
        summary.propostas += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use crate::repositories::{ProposalRepository, SqlProposalRepository, UserRepository};
    use crate::{connect_with_settings, migrations};

    use super::{seed_baseline, SEED_ADMIN_LOGIN};

    #[tokio::test]
    async fn seeding_creates_admin_client_and_proposal() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        let summary = seed_baseline(&pool).await.expect("seed");
        assert_eq!(summary.usuarios, 1);
        assert_eq!(summary.clientes, 1);
        assert_eq!(summary.propostas, 1);

        let users = crate::repositories::SqlUserRepository::new(pool.clone());
        let admin = users
            .find_credentials(SEED_ADMIN_LOGIN)
            .await
            .expect("lookup")
            .expect("admin should exist");
        assert!(admin.user.perfil == orcapro_core::domain::user::Perfil::Admin);

        let proposals = SqlProposalRepository::new(pool.clone());
        let records = proposals.list().await.expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].numero, "260001");
        assert!(records[0].escopo.contains("Mão de obra especializada;"));
    }

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate_records() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        seed_baseline(&pool).await.expect("first seed");
        let second = seed_baseline(&pool).await.expect("second seed");

        assert_eq!(second.usuarios, 0);
        assert_eq!(second.clientes, 0);
        assert_eq!(second.propostas, 0);
    }
}
