//! AwesomeAPI provider (`cep.awesomeapi.com.br`).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::cep::model::CepAddress;
use crate::cep::{CepProvider, TEST_CEP};
use crate::config;

pub const KEY: &str = "awesomeapi";

pub struct AwesomeApi {
    client: reqwest::Client,
    base_url: String,
}

impl AwesomeApi {
    /// Slower upstream than ViaCEP, so it carries its own 15-second
    /// timeout.
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
        format!("{}/{}", self.base_url, cep)
    }

    /// AwesomeAPI renamed its keys at least once; the first key present
    /// among the known pair wins. Null values fall through to the
    /// alternate key.
    fn parse(&self, cep: &str, body: Value) -> Option<CepAddress> {
        if body.get("status").and_then(Value::as_str) == Some("error") {
            tracing::warn!(provider = self.name(), %cep, "postal code not found");
            return None;
        }

        let address = CepAddress::new(
            cep,
            first_of(&body, ["address", "logradouro"]),
            first_of(&body, ["district", "bairro"]),
            first_of(&body, ["city", "localidade"]),
            first_of(&body, ["state", "uf"]),
            first_of(&body, ["complement", "complemento"]),
        );
        if address.is_none() {
            tracing::warn!(provider = self.name(), %cep, "response missing street and city");
        }

        address
    }
}

fn first_of(body: &Value, keys: [&str; 2]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(key))
        .find_map(Value::as_str)
        .map(ToOwned::to_owned)
}

#[async_trait]
impl CepProvider for AwesomeApi {
    fn key(&self) -> &'static str {
        KEY
    }

    fn name(&self) -> &'static str {
        "AwesomeAPI"
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

        match response.json::<Value>().await {
            Ok(body) => self.parse(cep, body),
            Err(err) => {
                tracing::error!(provider = self.name(), %cep, error = %err, "unreadable response");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> AwesomeApi {
        AwesomeApi::new(&config::CepProviderSettings {
            base_url: "https://cep.awesomeapi.com.br/json".into(),
            timeout_secs: 15,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_primary_keys() {
        let body = json!({
            "cep": "01001000",
            "address": "Praça da Sé",
            "district": "Sé",
            "city": "São Paulo",
            "state": "SP"
        });

        let address = provider().parse("01001000", body).unwrap();
        assert_eq!(address.street, "Praça da Sé");
        assert_eq!(address.neighborhood.as_deref(), Some("Sé"));
        assert_eq!(address.city.as_deref(), Some("São Paulo"));
    }

    #[test]
    fn test_parse_alias_keys_equivalent() {
        let aliased = json!({
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "complemento": "lado ímpar"
        });
        let primary = json!({
            "address": "Praça da Sé",
            "district": "Sé",
            "city": "São Paulo",
            "state": "SP",
            "complement": "lado ímpar"
        });

        assert_eq!(
            provider().parse("01001000", aliased),
            provider().parse("01001000", primary)
        );
    }

    #[test]
    fn test_parse_null_primary_falls_through() {
        let body = json!({
            "address": null,
            "logradouro": "Praça da Sé",
            "city": "São Paulo"
        });

        let address = provider().parse("01001000", body).unwrap();
        assert_eq!(address.street, "Praça da Sé");
    }

    #[test]
    fn test_parse_error_status_marker() {
        let body = json!({"status": "error", "message": "CEP não encontrado"});
        assert!(provider().parse("99999999", body).is_none());
    }

    #[test]
    fn test_parse_incomplete_response() {
        let body = json!({"state": "SP"});
        assert!(provider().parse("01001000", body).is_none());
    }
}
