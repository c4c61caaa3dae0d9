//! IASME Cyber Essentials certificate lookup

use super::spotlight::SignedWorkflowClient;
use crate::client::BaseClient;
use dm_api_core::auth::{Auth, ROUTE_MANUAL};
use dm_api_core::config::ClientConfig;
use dm_api_core::envelope::{is_empty_object, Envelope};
use dm_api_core::error::{ApiError, ApiResult};
use dm_api_core::request::QueryParams;
use serde_json::{json, Value};

const GET_CYBER_ESSENTIALS_CERTIFICATE: &str = "/workflows/d92a8b97421e4552845c9e6dc0aca5e2/triggers/manual/paths/invoke/%5Batt%5D.%5BIASMECyberSecurityCertification%5D/";

/// Cyber Essentials certificate workflow client
#[derive(Debug, Clone)]
pub struct CyberEssentialsClient {
    client: BaseClient,
}

impl CyberEssentialsClient {
    /// Create a client
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::SignedQuery { route: ROUTE_MANUAL })?,
        })
    }

    /// Look up a certificate by number
    ///
    /// Answers `{"cyberEssentialsCertificateDetails": <first match>}`; no
    /// match is reported as a 404.
    pub fn get_cyber_essentials_certificate(&self, certificate_number: &str) -> ApiResult<Value> {
        let query = QueryParams::new().with(
            "Filter",
            format!("CertificateNumber eq '{certificate_number}'"),
        );
        let response = self
            .client
            .get_with(GET_CYBER_ESSENTIALS_CERTIFICATE, query)?;

        if is_empty_object(&response) {
            return Ok(json!({}));
        }

        let details = response
            .as_array()
            .ok_or_else(|| ApiError::invalid_response(200, "certificate lookup did not return a list"))?
            .first()
            .cloned()
            .ok_or_else(|| {
                ApiError::http(
                    404,
                    format!("Could not find Cyber Essentials certificate {certificate_number}"),
                )
            })?;

        Ok(Envelope::wrap("cyberEssentialsCertificateDetails", details).into_value())
    }
}

impl SignedWorkflowClient for CyberEssentialsClient {
    fn client(&self) -> &BaseClient {
        &self.client
    }

    fn client_mut(&mut self) -> &mut BaseClient {
        &mut self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, Server};

    fn client(server: &Server) -> CyberEssentialsClient {
        CyberEssentialsClient::new(ClientConfig::new(server.url(), "api-key")).unwrap()
    }

    fn certificate_mock(server: &mut Server) -> Mock {
        server
            .mock(
                "GET",
                "/workflows/d92a8b97421e4552845c9e6dc0aca5e2/triggers/manual/paths/invoke/%5Batt%5D.%5BIASMECyberSecurityCertification%5D/",
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api-version".into(), "2016-10-01".into()),
                Matcher::UrlEncoded("sp".into(), "/triggers/manual/run".into()),
                Matcher::UrlEncoded("sv".into(), "1.0".into()),
                Matcher::UrlEncoded("sig".into(), "api-key".into()),
                Matcher::UrlEncoded("Filter".into(), "CertificateNumber eq '123456789'".into()),
            ]))
    }

    #[test]
    fn test_get_cyber_essentials_certificate() {
        let mut server = Server::new();
        let mock = certificate_mock(&mut server)
            .with_status(200)
            .with_body(r#"[{"CertificateNumber": "123456789", "Level": "Cyber Essentials"}]"#)
            .create();

        let result = client(&server)
            .get_cyber_essentials_certificate("123456789")
            .unwrap();
        assert_eq!(
            result,
            json!({"cyberEssentialsCertificateDetails": {
                "CertificateNumber": "123456789",
                "Level": "Cyber Essentials",
            }})
        );
        mock.assert();
    }

    #[test]
    fn test_get_cyber_essentials_certificate_bad_request() {
        let mut server = Server::new();
        let _mock = certificate_mock(&mut server).with_status(400).create();

        let err = client(&server)
            .get_cyber_essentials_certificate("123456789")
            .unwrap_err();
        assert!(err.has_status(400));
    }

    #[test]
    fn test_get_cyber_essentials_certificate_no_match() {
        let mut server = Server::new();
        let _mock = certificate_mock(&mut server).with_status(200).with_body("[]").create();

        let err = client(&server)
            .get_cyber_essentials_certificate("123456789")
            .unwrap_err();
        assert!(err.has_status(404));
    }

    #[test]
    fn test_get_status_is_not_found() {
        let server = Server::new();
        assert!(matches!(client(&server).get_status(), Err(ApiError::NotFound(_))));
    }
}
