//! ViaCEP provider (`viacep.com.br`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::cep::model::CepAddress;
use crate::cep::{CepProvider, TEST_CEP};
use crate::config;

pub const KEY: &str = "viacep";

/// Wire shape of a ViaCEP answer. Unknown postal codes come back with
/// an `erro` flag instead of an HTTP error status.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: bool,
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
    complemento: Option<String>,
}

pub struct ViaCep {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCep {
    /// Build the provider with its own client so the 10-second timeout
    /// stays independent from other providers.
    pub fn new(settings: &config::CepProviderSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, cep: &str) -> String {
        format!("{}/{}/json", self.base_url, cep)
    }

    fn parse(&self, cep: &str, body: ViaCepResponse) -> Option<CepAddress> {
        if body.erro {
            tracing::warn!(provider = self.name(), %cep, "postal code not found");
            return None;
        }

        let address = CepAddress::new(
            cep,
            body.logradouro,
            body.bairro,
            body.localidade,
            body.uf,
            body.complemento,
        );
        if address.is_none() {
            tracing::warn!(provider = self.name(), %cep, "response missing street and city");
        }

        address
    }
}

#[async_trait]
impl CepProvider for ViaCep {
    fn key(&self) -> &'static str {
        KEY
    }

    fn name(&self) -> &'static str {
        "ViaCEP"
    }

    async fn is_available(&self) -> bool {
        match self.client.get(self.url(TEST_CEP)).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(provider = self.name(), error = %err, "provider unreachable");
                false
            },
        }
    }

    async fn search(&self, cep: &str) -> Option<CepAddress> {
        tracing::info!(provider = self.name(), %cep, "searching postal code");

        let response = match self.client.get(self.url(cep)).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(provider = self.name(), %cep, error = %err, "request failed");
                return None;
            },
        };

        if !response.status().is_success() {
            tracing::warn!(
                provider = self.name(),
                %cep,
                status = %response.status(),
                "provider returned an error status"
            );
            return None;
        }

        match response.json::<ViaCepResponse>().await {
            Ok(body) => self.parse(cep, body),
            Err(err) => {
                tracing::error!(provider = self.name(), %cep, error = %err, "unreadable response");
                None
            },
        }
    }
}
