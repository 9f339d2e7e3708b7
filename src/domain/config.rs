use super::keys::{PrivateKey, PublicKey};
use crate::error::{PaymentError, Result};
use std::net::Ipv4Addr;
use url::Url;

/// Path prefixes of the three gateway endpoints, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayPaths {
    pub initiate: String,
    pub complete: String,
    pub verify: String,
}

impl Default for GatewayPaths {
    fn default() -> Self {
        Self {
            initiate: "check-out/initialize".to_string(),
            complete: "check-out/complete".to_string(),
            verify: "verify/payment".to_string(),
        }
    }
}

/// Immutable merchant settings, fixed for the lifetime of a client.
///
/// Built through [`MerchantConfig::builder`]; every field is required and
/// validated up front so a misconfigured client fails at construction rather
/// than on its first gateway call.
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    merchant_id: String,
    base_url: Url,
    callback_url: Url,
    /// The gateway's public key: seals outgoing payloads and checks gateway signatures.
    public_key: PublicKey,
    /// The merchant's private key: signs outgoing payloads and opens sealed responses.
    private_key: PrivateKey,
    client_ip_address: Ipv4Addr,
    paths: GatewayPaths,
}

impl MerchantConfig {
    pub fn builder() -> MerchantConfigBuilder {
        MerchantConfigBuilder::default()
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn callback_url(&self) -> &Url {
        &self.callback_url
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn client_ip_address(&self) -> Ipv4Addr {
        self.client_ip_address
    }

    pub fn paths(&self) -> &GatewayPaths {
        &self.paths
    }

    /// Builds `base_url/<prefix>/<segments...>`, percent-encoding each segment.
    pub fn endpoint(&self, prefix: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                PaymentError::ConfigError("base_url cannot carry a path".to_string())
            })?;
            path.pop_if_empty();
            path.extend(prefix.split('/').filter(|s| !s.is_empty()));
            path.extend(segments);
        }
        Ok(url)
    }
}

#[derive(Debug, Default)]
pub struct MerchantConfigBuilder {
    merchant_id: Option<String>,
    base_url: Option<String>,
    callback_url: Option<String>,
    public_key: Option<String>,
    private_key: Option<String>,
    client_ip_address: Option<String>,
    paths: Option<GatewayPaths>,
}

impl MerchantConfigBuilder {
    pub fn merchant_id(mut self, value: impl Into<String>) -> Self {
        self.merchant_id = Some(value.into());
        self
    }

    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn callback_url(mut self, value: impl Into<String>) -> Self {
        self.callback_url = Some(value.into());
        self
    }

    /// Gateway public key, as PEM or bare base64 body.
    pub fn public_key(mut self, value: impl Into<String>) -> Self {
        self.public_key = Some(value.into());
        self
    }

    /// Merchant private key, as PEM or bare base64 body.
    pub fn private_key(mut self, value: impl Into<String>) -> Self {
        self.private_key = Some(value.into());
        self
    }

    pub fn client_ip_address(mut self, value: impl Into<String>) -> Self {
        self.client_ip_address = Some(value.into());
        self
    }

    pub fn paths(mut self, paths: GatewayPaths) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn build(self) -> Result<MerchantConfig> {
        let merchant_id = required("merchant_id", self.merchant_id)?;
        let base_url = parse_http_url("base_url", &required("base_url", self.base_url)?)?;
        let callback_url =
            parse_http_url("callback_url", &required("callback_url", self.callback_url)?)?;
        let public_key = PublicKey::parse(&required("public_key", self.public_key)?)?;
        let private_key = PrivateKey::parse(&required("private_key", self.private_key)?)?;
        let client_ip = required("client_ip_address", self.client_ip_address)?;
        let client_ip_address = client_ip.trim().parse::<Ipv4Addr>().map_err(|_| {
            PaymentError::ConfigError(format!(
                "client_ip_address '{}' is not an IPv4 address",
                client_ip
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(PaymentError::ConfigError(
                "base_url cannot carry a path".to_string(),
            ));
        }

        Ok(MerchantConfig {
            merchant_id,
            base_url,
            callback_url,
            public_key,
            private_key,
            client_ip_address,
            paths: self.paths.unwrap_or_default(),
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PaymentError::ConfigError(format!("{} is required", field))),
    }
}

fn parse_http_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value.trim())
        .map_err(|e| PaymentError::ConfigError(format!("{} is not a valid URL: {}", field, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PaymentError::ConfigError(format!(
            "{} must use http or https, not {}",
            field, other
        ))),
    }
}
