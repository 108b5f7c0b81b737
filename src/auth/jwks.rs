use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
struct JwksKeyData {
    n: String,
    e: String,
    algorithm: Algorithm,
}

/// Caches the Keycloak realm's signing keys, fetched from the JWKS endpoint
/// and kept per `kid` with a one-hour TTL so a realm key rotation is picked
/// up without restarting the server.
#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, JwksKeyData>>,
    jwks_url: String,
    issuer: String,
    client: reqwest::Client,
}

impl JwksCache {
    /// `base_url` is the Keycloak root (e.g. `https://id.example.com`),
    /// `realm` the realm name.
    pub fn new(base_url: &str, realm: &str) -> Self {
        let client = reqwest::Client::new();
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(std::time::Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        let base = base_url.trim_end_matches('/');
        let issuer = format!("{base}/realms/{realm}");
        let jwks_url = format!("{issuer}/protocol/openid-connect/certs");

        Self {
            cache,
            jwks_url,
            issuer,
            client,
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response: reqwest::Response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to get JWKS text: {e}"))?;

        serde_json::from_str(&text).map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn get_key_data(&self, kid: &str) -> Result<JwksKeyData, String> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let keys = jwks["keys"].as_array().ok_or("No keys in JWKS")?;

        let key_data = keys
            .iter()
            .find(|k| k["kid"].as_str() == Some(kid))
            .ok_or(format!("Key with kid={kid} not found in JWKS"))?;

        let n = key_data["n"]
            .as_str()
            .ok_or("Missing 'n' in JWK")?
            .to_string();
        let e = key_data["e"]
            .as_str()
            .ok_or("Missing 'e' in JWK")?
            .to_string();

        let alg_str = key_data["alg"].as_str().unwrap_or("RS256");
        let algorithm = match alg_str {
            "RS256" => Algorithm::RS256,
            "RS384" => Algorithm::RS384,
            "RS512" => Algorithm::RS512,
            _ => Algorithm::RS256,
        };

        let key_data = JwksKeyData { n, e, algorithm };

        self.cache.insert(kid.to_string(), key_data.clone()).await;
        Ok(key_data)
    }

    pub async fn validate_token(
        &self,
        token: &str,
    ) -> Result<TokenData<super::jwt::Claims>, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key_data = self.get_key_data(&kid).await?;

        let decoding_key = DecodingKey::from_rsa_components(&key_data.n, &key_data.e)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(key_data.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;

        decode::<super::jwt::Claims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}
