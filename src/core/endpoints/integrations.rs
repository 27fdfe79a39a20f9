//! Task-tool integration endpoints
//!
//! The connectors themselves run on the backend; the client only says which
//! provider, assessment and finding a ticket is for.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::api::{ApiError, ApiGateway, RequestOptions, Transport};
use crate::core::models::{
    ConnectedIntegration, IntegrationProvider, MockTagResult, OrgIntegration, TicketRef,
    WorkflowResult,
};

#[derive(Debug, Serialize)]
struct ConnectRequest<'a> {
    provider: IntegrationProvider,
    config: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct TicketRequest<'a> {
    provider: IntegrationProvider,
    assessment_id: i64,
    finding_key: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    ai_suggestions: &'a [String],
}

fn is_empty(values: &&[String]) -> bool {
    values.is_empty()
}

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    finding_key: &'a str,
    tags: &'a [String],
    suggestions: &'a [String],
}

#[derive(Debug, Serialize)]
struct WorkflowRequest {
    assessment_id: i64,
    include_ai_suggestions: bool,
}

impl<T: Transport> ApiGateway<T> {
    pub async fn list_integrations(&self, org_id: i64) -> Result<Vec<OrgIntegration>, ApiError> {
        self.request_json(
            &format!("/orgs/{}/integrations", org_id),
            RequestOptions::get(),
        )
        .await
    }

    pub async fn connect_integration(
        &self,
        org_id: i64,
        provider: IntegrationProvider,
        config: &BTreeMap<String, String>,
    ) -> Result<ConnectedIntegration, ApiError> {
        let options = RequestOptions::post().json(&ConnectRequest { provider, config })?;
        self.request_json(&format!("/orgs/{}/integrations", org_id), options)
            .await
    }

    /// Push one finding to a task tool. Suggestions are only sent when present.
    pub async fn create_ticket(
        &self,
        org_id: i64,
        provider: IntegrationProvider,
        assessment_id: i64,
        finding_key: &str,
        ai_suggestions: &[String],
    ) -> Result<TicketRef, ApiError> {
        let options = RequestOptions::post().json(&TicketRequest {
            provider,
            assessment_id,
            finding_key,
            ai_suggestions,
        })?;
        self.request_json(&format!("/orgs/{}/create-ticket", org_id), options)
            .await
    }

    /// Demo-only endpoint; the backend does not call Google.
    pub async fn mock_google_workspace_tag(
        &self,
        org_id: i64,
        finding_key: &str,
        tags: &[String],
        suggestions: &[String],
    ) -> Result<MockTagResult, ApiError> {
        let options = RequestOptions::post().json(&TagRequest {
            finding_key,
            tags,
            suggestions,
        })?;
        self.request_json(
            &format!("/orgs/{}/mock-google-workspace-tag", org_id),
            options,
        )
        .await
    }

    /// Create tickets for every finding across all connected integrations.
    pub async fn run_workflow(
        &self,
        org_id: i64,
        assessment_id: i64,
        include_ai_suggestions: bool,
    ) -> Result<WorkflowResult, ApiError> {
        let options = RequestOptions::post().json(&WorkflowRequest {
            assessment_id,
            include_ai_suggestions,
        })?;
        self.request_json(&format!("/orgs/{}/run-workflow", org_id), options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use serde_json::{Value, json};

    use crate::core::api::{ApiGateway, MockTransport};
    use crate::core::models::IntegrationProvider;
    use crate::core::session::{MemoryStorage, SessionSignal, SessionStore};

    fn gateway() -> (Arc<MockTransport>, ApiGateway<Arc<MockTransport>>) {
        let signal = SessionSignal::new();
        let store = SessionStore::init(MemoryStorage::new(), &signal);
        let transport = Arc::new(MockTransport::new());
        let gateway = ApiGateway::new("/api", Arc::clone(&transport), store.reader(), signal);
        (transport, gateway)
    }

    fn sent_body(transport: &MockTransport) -> Value {
        serde_json::from_str(transport.last_request().body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_connect_trello() {
        let (transport, gateway) = gateway();
        transport.respond_json(200, json!({"id": 3, "provider": "trello", "connected": true}));

        let config = BTreeMap::from([
            ("api_key".to_string(), "k".to_string()),
            ("list_id".to_string(), "l".to_string()),
        ]);
        let connected = gateway
            .connect_integration(7, IntegrationProvider::Trello, &config)
            .await
            .unwrap();

        assert!(connected.connected);
        assert_eq!(transport.last_request().url, "/api/orgs/7/integrations");
        assert_eq!(
            sent_body(&transport),
            json!({"provider": "trello", "config": {"api_key": "k", "list_id": "l"}})
        );
    }

    #[tokio::test]
    async fn test_ticket_omits_empty_suggestions() {
        let (transport, gateway) = gateway();
        transport
            .respond_json(200, json!({"url": "https://trello.com/c/1"}))
            .respond_json(200, json!({"key": "SEC-4"}));

        let ticket = gateway
            .create_ticket(7, IntegrationProvider::Trello, 8, "mfa_all", &[])
            .await
            .unwrap();
        assert_eq!(ticket.url.as_deref(), Some("https://trello.com/c/1"));
        assert_eq!(
            sent_body(&transport),
            json!({"provider": "trello", "assessment_id": 8, "finding_key": "mfa_all"})
        );

        let suggestions = vec!["Enforce MFA in admin console".to_string()];
        let ticket = gateway
            .create_ticket(7, IntegrationProvider::Jira, 8, "mfa_all", &suggestions)
            .await
            .unwrap();
        assert_eq!(ticket.key.as_deref(), Some("SEC-4"));
        assert_eq!(
            sent_body(&transport)["ai_suggestions"],
            json!(["Enforce MFA in admin console"])
        );
    }

    #[tokio::test]
    async fn test_list_integrations() {
        let (transport, gateway) = gateway();
        transport.respond_json(
            200,
            json!([{"id": 1, "provider": "google_tasks", "connected": false, "config": {}}]),
        );

        let integrations = gateway.list_integrations(7).await.unwrap();

        assert_eq!(integrations[0].provider, IntegrationProvider::GoogleTasks);
        assert!(!integrations[0].connected);
    }

    #[tokio::test]
    async fn test_run_workflow() {
        let (transport, gateway) = gateway();
        transport.respond_json(200, json!({"created": [], "errors": []}));

        let result = gateway.run_workflow(7, 8, true).await.unwrap();

        assert!(result.created.is_empty());
        assert_eq!(transport.last_request().url, "/api/orgs/7/run-workflow");
        assert_eq!(
            sent_body(&transport),
            json!({"assessment_id": 8, "include_ai_suggestions": true})
        );
    }

    #[tokio::test]
    async fn test_mock_google_tag() {
        let (transport, gateway) = gateway();
        transport.respond_json(200, json!({"success": true, "message": "Tagged"}));

        let tags = vec!["identity".to_string()];
        let result = gateway
            .mock_google_workspace_tag(7, "mfa_all", &tags, &[])
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            transport.last_request().url,
            "/api/orgs/7/mock-google-workspace-tag"
        );
    }
}
