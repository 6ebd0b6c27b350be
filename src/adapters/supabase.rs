use crate::config::toml_config::BackendConfig;
use crate::core::CompanySource;
use crate::domain::model::{Company, Service};
use crate::utils::error::{Result, SearchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Reads companies and services through the store's PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    companies_table: String,
    services_table: String,
}

impl SupabaseClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            companies_table: config.companies_table.clone(),
            services_table: config.services_table.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.table_url(table);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*")])
            .query(query)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Backend response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::BackendError {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<T> = response.json().await?;
        Ok(rows)
    }
}

#[async_trait]
impl CompanySource for SupabaseClient {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        self.select(&self.companies_table, &[("order", "nome.asc")]).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>> {
        let filter = format!("eq.{}", slug);
        let mut rows: Vec<Company> = self
            .select(&self.companies_table, &[("slug", filter.as_str()), ("limit", "1")])
            .await?;
        Ok(rows.pop())
    }

    async fn list_services(&self, company_id: &str) -> Result<Vec<Service>> {
        let filter = format!("eq.{}", company_id);
        self.select(
            &self.services_table,
            &[("empresa_id", filter.as_str()), ("order", "nome.asc")],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn backend(server: &MockServer) -> BackendConfig {
        BackendConfig {
            url: server.base_url(),
            anon_key: "anon-test-key".to_string(),
            ..BackendConfig::default()
        }
    }

    #[tokio::test]
    async fn test_list_companies_sends_order_and_keys() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/empresas")
                .query_param("select", "*")
                .query_param("order", "nome.asc")
                .header("apikey", "anon-test-key")
                .header("Authorization", "Bearer anon-test-key");
            then.status(200).json_body(serde_json::json!([
                {
                    "id": "a1", "nome": "Barbearia do João", "descricao": "Cortes",
                    "categoria": "Barbearia", "latitude": -23.56, "longitude": -46.65,
                    "avaliacao": 4.7, "slug": "barbearia-do-joao"
                }
            ]));
        });

        let client = SupabaseClient::new(&backend(&server)).unwrap();
        let companies = client.list_companies().await.unwrap();

        mock.assert();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].slug, "barbearia-do-joao");
    }

    #[tokio::test]
    async fn test_find_by_slug_missing_returns_none() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/empresas")
                .query_param("slug", "eq.nao-existe")
                .query_param("limit", "1");
            then.status(200).json_body(serde_json::json!([]));
        });

        let client = SupabaseClient::new(&backend(&server)).unwrap();
        assert!(client.find_by_slug("nao-existe").await.unwrap().is_none());
        mock.assert();
    }

    #[tokio::test]
    async fn test_error_status_becomes_backend_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/servicos");
            then.status(401).body("Invalid API key");
        });

        let client = SupabaseClient::new(&backend(&server)).unwrap();
        let err = client.list_services("a1").await.unwrap_err();
        match err {
            SearchError::BackendError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
