//! Multi-provider postal code (CEP) lookup with priority fallback.

mod awesomeapi;
mod model;
mod viacep;

pub use awesomeapi::AwesomeApi;
pub use model::CepAddress;
pub use viacep::ViaCep;

use async_trait::async_trait;
use serde::Serialize;

use crate::config;
use crate::error::{Result, ServerError};

/// Known-good postal code used for availability probes.
pub(crate) const TEST_CEP: &str = "01001000";

/// One external address-lookup provider.
///
/// Implementations absorb their own failures: transport errors, error
/// statuses, provider-specific not-found markers and incomplete payloads
/// are all logged and collapsed into `None`.
#[async_trait]
pub trait CepProvider: Send + Sync {
    /// Registry key, used for configuration and the direct lookup mode.
    fn key(&self) -> &'static str;

    /// Human-readable provider name for logs and status responses.
    fn name(&self) -> &'static str;

    /// Probe the provider with [`TEST_CEP`].
    async fn is_available(&self) -> bool;

    /// Query the provider for a normalized (digits-only) postal code.
    async fn search(&self, cep: &str) -> Option<CepAddress>;
}

/// Reachability of a single provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub key: String,
    pub name: String,
    pub available: bool,
}

/// Aggregate view over the configured providers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CepStatistics {
    pub available: usize,
    pub total: usize,
    pub priority: Vec<String>,
}

/// Strip every non-digit character from a raw postal code.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Queries providers in priority order, returning the first valid
/// answer. The provider list is fixed at construction.
pub struct CepLookup {
    providers: Vec<Box<dyn CepProvider>>,
}

impl CepLookup {
    /// Instantiate the providers named by the configured priority list.
    pub fn new(config: &config::Cep) -> Result<Self> {
        let mut providers: Vec<Box<dyn CepProvider>> = Vec::with_capacity(config.priority.len());

        for key in &config.priority {
            let provider: Box<dyn CepProvider> = match key.as_str() {
                viacep::KEY => Box::new(ViaCep::new(&config.viacep).map_err(client_error)?),
                awesomeapi::KEY => {
                    Box::new(AwesomeApi::new(&config.awesomeapi).map_err(client_error)?)
                },
                unknown => return Err(ServerError::UnknownProvider(unknown.to_owned())),
            };
            providers.push(provider);
        }

        Ok(Self { providers })
    }

    #[cfg(test)]
    fn with_providers(providers: Vec<Box<dyn CepProvider>>) -> Self {
        Self { providers }
    }

    /// Search every provider in priority order until one answers.
    ///
    /// Unavailable providers are skipped, failing providers fall through
    /// to the next one; `None` only after the whole list is exhausted.
    pub async fn search(&self, raw: &str) -> Option<CepAddress> {
        let cep = normalize(raw);

        for provider in &self.providers {
            if !provider.is_available().await {
                tracing::warn!(provider = provider.name(), "provider unavailable, trying next");
                continue;
            }

            if let Some(address) = provider.search(&cep).await {
                return Some(address);
            }

            tracing::info!(provider = provider.name(), %cep, "no result, trying next");
        }

        tracing::warn!(%cep, "postal code not found on any provider");
        None
    }

    /// Query one named provider directly, bypassing the fallback loop.
    pub async fn search_with(&self, raw: &str, key: &str) -> Result<Option<CepAddress>> {
        let provider = self
            .providers
            .iter()
            .find(|provider| provider.key() == key)
            .ok_or_else(|| ServerError::UnknownProvider(key.to_owned()))?;

        let cep = normalize(raw);
        tracing::info!(provider = provider.name(), %cep, "direct provider lookup");

        Ok(provider.search(&cep).await)
    }

    /// Probe every provider and report reachability.
    pub async fn availability(&self) -> Vec<ProviderStatus> {
        let mut statuses = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            statuses.push(ProviderStatus {
                key: provider.key().to_owned(),
                name: provider.name().to_owned(),
                available: provider.is_available().await,
            });
        }

        statuses
    }

    /// Count reachable providers and echo the priority order.
    pub async fn statistics(&self) -> CepStatistics {
        let statuses = self.availability().await;

        CepStatistics {
            available: statuses.iter().filter(|status| status.available).count(),
            total: statuses.len(),
            priority: statuses.into_iter().map(|status| status.key).collect(),
        }
    }
}

fn client_error(err: reqwest::Error) -> ServerError {
    ServerError::Internal {
        details: format!("cannot build provider client: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider {
        key: &'static str,
        available: bool,
        result: Option<CepAddress>,
    }

    impl StubProvider {
        fn answering(key: &'static str, street: &str) -> Self {
            Self {
                key,
                available: true,
                result: CepAddress::new(
                    "01001000",
                    Some(street.to_string()),
                    None,
                    Some("São Paulo".to_string()),
                    None,
                    None,
                ),
            }
        }

        fn empty(key: &'static str) -> Self {
            Self { key, available: true, result: None }
        }

        fn unreachable(key: &'static str) -> Self {
            Self { key, available: false, result: None }
        }
    }

    #[async_trait]
    impl CepProvider for StubProvider {
        fn key(&self) -> &'static str {
            self.key
        }

        fn name(&self) -> &'static str {
            self.key
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn search(&self, _cep: &str) -> Option<CepAddress> {
            self.result.clone()
        }
    }

    fn lookup(providers: Vec<StubProvider>) -> CepLookup {
        CepLookup::with_providers(
            providers
                .into_iter()
                .map(|provider| Box::new(provider) as Box<dyn CepProvider>)
                .collect(),
        )
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("01001-000"), "01001000");
        assert_eq!(normalize("cep: 01.001-000"), "01001000");
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let lookup = lookup(vec![
            StubProvider::answering("first", "Rua A"),
            StubProvider::answering("second", "Rua B"),
        ]);

        let address = lookup.search("01001-000").await.unwrap();
        assert_eq!(address.street, "Rua A");
    }

    #[tokio::test]
    async fn test_unavailable_provider_skipped() {
        let lookup = lookup(vec![
            StubProvider::unreachable("first"),
            StubProvider::answering("second", "Rua B"),
        ]);

        let address = lookup.search("01001000").await.unwrap();
        assert_eq!(address.street, "Rua B");
    }

    #[tokio::test]
    async fn test_miss_falls_through() {
        let lookup = lookup(vec![
            StubProvider::empty("first"),
            StubProvider::answering("second", "Rua B"),
        ]);

        let address = lookup.search("01001000").await.unwrap();
        assert_eq!(address.street, "Rua B");
    }

    #[tokio::test]
    async fn test_exhausted_providers_yield_none() {
        let lookup = lookup(vec![
            StubProvider::unreachable("first"),
            StubProvider::empty("second"),
        ]);

        assert!(lookup.search("01001000").await.is_none());
    }

    #[tokio::test]
    async fn test_direct_mode_skips_priority() {
        let lookup = lookup(vec![
            StubProvider::answering("first", "Rua A"),
            StubProvider::answering("second", "Rua B"),
        ]);

        let address = lookup.search_with("01001000", "second").await.unwrap().unwrap();
        assert_eq!(address.street, "Rua B");
    }

    #[tokio::test]
    async fn test_direct_mode_unknown_provider() {
        let lookup = lookup(vec![StubProvider::answering("first", "Rua A")]);

        let err = lookup.search_with("01001000", "nope").await.unwrap_err();
        assert!(matches!(err, ServerError::UnknownProvider(key) if key == "nope"));
    }

    #[tokio::test]
    async fn test_availability_snapshot() {
        let lookup = lookup(vec![
            StubProvider::answering("first", "Rua A"),
            StubProvider::unreachable("second"),
        ]);

        let statuses = lookup.availability().await;
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].available);
        assert!(!statuses[1].available);
    }

    #[tokio::test]
    async fn test_statistics() {
        let lookup = lookup(vec![
            StubProvider::answering("first", "Rua A"),
            StubProvider::unreachable("second"),
        ]);

        let stats = lookup.statistics().await;
        assert_eq!(stats.available, 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.priority, vec!["first", "second"]);
    }

    #[test]
    fn test_configured_registry_rejects_unknown_key() {
        let config = config::Cep {
            priority: vec!["viacep".into(), "postmon".into()],
            ..config::Cep::default()
        };

        assert!(matches!(
            CepLookup::new(&config),
            Err(ServerError::UnknownProvider(key)) if key == "postmon"
        ));
    }
}
