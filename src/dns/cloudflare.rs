use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::DnsError;
use super::provider::{DnsProvider, DnsRecord, RecordInput, RecordPage};

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare DNS records API bound to a single zone.
pub struct CloudflareProvider {
    client: Client,
    base_url: String,
    zone_id: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<CloudflareError>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct CloudflareError {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    total_pages: u32,
}

impl CloudflareProvider {
    pub fn with_base_url(
        base_url: &str,
        zone_id: &str,
        api_token: &str,
        timeout: Duration,
    ) -> Result<Self, DnsError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            zone_id: zone_id.to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, self.zone_id)
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_token)
    }

    /// Send a request and unwrap the response envelope. The `success` flag is
    /// checked regardless of the HTTP status.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<CloudflareResponse<T>, DnsError> {
        let response = request
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Cloudflare API response");

        let envelope: CloudflareResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(DnsError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }
            Err(e) => return Err(DnsError::Parse(e)),
        };

        if !envelope.success {
            let message = envelope
                .errors
                .first()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(DnsError::Unsuccessful(message));
        }

        if !status.is_success() {
            return Err(DnsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(envelope)
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn list_records(
        &self,
        record_type: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, DnsError> {
        debug!(record_type, page, per_page, "GET {}", self.records_url());

        let request = self.client.get(self.records_url()).query(&[
            ("type", record_type.to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]);

        let envelope: CloudflareResponse<Vec<DnsRecord>> = self.send(request).await?;

        let records = envelope.result.unwrap_or_default();
        let total_pages = envelope
            .result_info
            .map(|info| info.total_pages)
            .unwrap_or(page);

        Ok(RecordPage {
            records,
            total_pages,
        })
    }

    async fn create_record(&self, input: &RecordInput) -> Result<(), DnsError> {
        debug!(name = %input.name, "POST {}", self.records_url());

        let request = self.client.post(self.records_url()).json(input);
        self.send::<serde_json::Value>(request).await?;

        Ok(())
    }

    async fn update_record(&self, record_id: &str, input: &RecordInput) -> Result<(), DnsError> {
        debug!(name = %input.name, "PUT {}", self.record_url(record_id));

        let request = self.client.put(self.record_url(record_id)).json(input);
        self.send::<serde_json::Value>(request).await?;

        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<(), DnsError> {
        debug!("DELETE {}", self.record_url(record_id));

        let request = self.client.delete(self.record_url(record_id));
        self.send::<serde_json::Value>(request).await?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_mock_provider(mock_server: &MockServer) -> CloudflareProvider {
        CloudflareProvider::with_base_url(
            &mock_server.uri(),
            "zone123",
            "test_token",
            DEFAULT_REQUEST_TIMEOUT,
        )
        .unwrap()
    }

    #[test]
    fn test_auth_header() {
        let provider = CloudflareProvider::with_base_url(
            CLOUDFLARE_API_BASE,
            "zone123",
            "test_token",
            DEFAULT_REQUEST_TIMEOUT,
        )
        .unwrap();

        assert_eq!(provider.auth_header(), "Bearer test_token");
        assert_eq!(
            provider.record_url("rec1"),
            "https://api.cloudflare.com/client/v4/zones/zone123/dns_records/rec1"
        );
    }

    #[tokio::test]
    async fn test_list_records_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone123/dns_records"))
            .and(header("Authorization", "Bearer test_token"))
            .and(query_param("type", "A"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "errors": [],
                "result": [
                    {
                        "id": "rec1",
                        "type": "A",
                        "name": "www.example.com",
                        "content": "192.0.2.1",
                        "ttl": 1,
                        "proxied": true
                    }
                ],
                "result_info": {"page": 2, "per_page": 100, "total_pages": 3, "count": 1, "total_count": 201}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server);
        let page = provider.list_records("A", 2, 100).await.unwrap();

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "rec1");
        assert!(page.records[0].proxied);
    }

    #[tokio::test]
    async fn test_create_record_sends_full_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zones/zone123/dns_records"))
            .and(body_json(serde_json::json!({
                "type": "A",
                "name": "new.example.com",
                "content": "192.0.2.10",
                "ttl": 1,
                "proxied": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "errors": [],
                "result": {"id": "created"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server);
        let input = RecordInput::a_record("new.example.com", "192.0.2.10");

        provider.create_record(&input).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_record_unsuccessful_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/zone123/dns_records/rec1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "errors": [{"code": 81057, "message": "Record already exists."}],
                "result": null
            })))
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server);
        let input = RecordInput::a_record("www.example.com", "192.0.2.10");

        let err = provider.update_record("rec1", &input).await.unwrap_err();
        assert!(matches!(err, DnsError::Unsuccessful(_)));
        assert!(err.to_string().contains("Record already exists."));
    }

    #[tokio::test]
    async fn test_list_records_without_result_info_is_last_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone123/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "errors": [],
                "result": []
            })))
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server);
        let page = provider.list_records("A", 4, 100).await.unwrap();

        assert!(page.records.is_empty());
        assert_eq!(page.total_pages, 4);
    }

    #[tokio::test]
    async fn test_error_entry_without_code() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/zone123/dns_records/rec1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "errors": [{"message": "Invalid request headers"}],
                "result": null
            })))
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server);
        let input = RecordInput::a_record("www.example.com", "192.0.2.10");

        let err = provider.update_record("rec1", &input).await.unwrap_err();
        match err {
            DnsError::Unsuccessful(message) => {
                assert!(message.contains("Invalid request headers"));
            }
            other => panic!("Expected Unsuccessful error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_record_http_error_without_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/zones/zone123/dns_records/rec1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server);

        let err = provider.delete_record("rec1").await.unwrap_err();
        match err {
            DnsError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_record_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/zones/zone123/dns_records/rec1"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "errors": [],
                "result": {"id": "rec1"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server);
        provider.delete_record("rec1").await.unwrap();
    }
}
