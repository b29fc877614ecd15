//! Normalized postal code lookup result.

use serde::Serialize;

/// Address as returned by a provider, mapped to one common shape.
///
/// Providers answer with heterogeneous field names; by the time a value
/// reaches this type it is normalized and immutable.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CepAddress {
    pub cep: String,
    pub street: String,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub complement: Option<String>,
}

impl CepAddress {
    /// Build an address, yielding `None` when both the street and the
    /// city are missing. A result without either is useless to callers.
    pub fn new(
        cep: impl Into<String>,
        street: Option<String>,
        neighborhood: Option<String>,
        city: Option<String>,
        state: Option<String>,
        complement: Option<String>,
    ) -> Option<Self> {
        let street = street.filter(|s| !s.is_empty()).unwrap_or_default();
        let city = city.filter(|s| !s.is_empty());

        if street.is_empty() && city.is_none() {
            return None;
        }

        Some(Self {
            cep: cep.into(),
            street,
            neighborhood: neighborhood.filter(|s| !s.is_empty()),
            city,
            state: state.filter(|s| !s.is_empty()),
            complement: complement.filter(|s| !s.is_empty()),
        })
    }

    /// Join the non-empty parts as `street, complement, neighborhood,
    /// city, state`.
    pub fn complete_address(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.street];
        parts.extend(
            [
                self.complement.as_deref(),
                self.neighborhood.as_deref(),
                self.city.as_deref(),
                self.state.as_deref(),
            ]
            .into_iter()
            .flatten(),
        );

        parts.retain(|part| !part.is_empty());
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_requires_street_or_city() {
        assert!(CepAddress::new("01001000", None, None, None, None, None).is_none());
        assert!(
            CepAddress::new("01001000", some(""), some("Centro"), some(""), None, None).is_none()
        );
        assert!(CepAddress::new("01001000", some("Praça da Sé"), None, None, None, None).is_some());
        assert!(CepAddress::new("01001000", None, None, some("São Paulo"), None, None).is_some());
    }

    #[test]
    fn test_complete_address_order_and_skips() {
        let address = CepAddress::new(
            "01001000",
            some("Praça da Sé"),
            some("Sé"),
            some("São Paulo"),
            some("SP"),
            some("lado ímpar"),
        )
        .unwrap();

        assert_eq!(
            address.complete_address(),
            "Praça da Sé, lado ímpar, Sé, São Paulo, SP"
        );
    }

    #[test]
    fn test_complete_address_skips_missing() {
        let address =
            CepAddress::new("01001000", some("Praça da Sé"), None, some("São Paulo"), None, None)
                .unwrap();

        assert_eq!(address.complete_address(), "Praça da Sé, São Paulo");
    }

    #[test]
    fn test_city_only() {
        let address =
            CepAddress::new("76900000", None, None, some("Ji-Paraná"), some("RO"), None).unwrap();

        assert_eq!(address.street, "");
        assert_eq!(address.complete_address(), "Ji-Paraná, RO");
    }
}
