//! Organization, scan, report and dashboard endpoints

use crate::core::api::{ApiError, ApiGateway, RequestOptions, Transport};
use crate::core::models::{DashboardOrg, Organization, OrganizationDraft, ReportRun, ScanRun};

impl<T: Transport> ApiGateway<T> {
    pub async fn list_orgs(&self) -> Result<Vec<Organization>, ApiError> {
        self.request_json("/orgs", RequestOptions::get()).await
    }

    pub async fn get_org(&self, id: i64) -> Result<Organization, ApiError> {
        self.request_json(&format!("/orgs/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create_org(&self, draft: &OrganizationDraft) -> Result<Organization, ApiError> {
        self.request_json("/orgs", RequestOptions::post().json(draft)?)
            .await
    }

    pub async fn update_org(
        &self,
        id: i64,
        draft: &OrganizationDraft,
    ) -> Result<Organization, ApiError> {
        self.request_json(&format!("/orgs/{}", id), RequestOptions::put().json(draft)?)
            .await
    }

    pub async fn run_scan(&self, org_id: i64) -> Result<ScanRun, ApiError> {
        self.request_json(&format!("/orgs/{}/scan", org_id), RequestOptions::post())
            .await
    }

    pub async fn generate_report(&self, org_id: i64) -> Result<ReportRun, ApiError> {
        self.request_json(
            &format!("/orgs/{}/generate-report", org_id),
            RequestOptions::post(),
        )
        .await
    }

    /// Organizations with their latest assessment, for the dashboard charts.
    pub async fn dashboard_summary(&self) -> Result<Vec<DashboardOrg>, ApiError> {
        self.request_json("/dashboard", RequestOptions::get()).await
    }

    /// Create demo organizations for the current user; returns the new list.
    pub async fn seed_demo(&self) -> Result<Vec<Organization>, ApiError> {
        self.request_json("/seed-demo", RequestOptions::post()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::core::api::{ApiGateway, Method, MockTransport};
    use crate::core::models::OrganizationDraft;
    use crate::core::session::{MemoryStorage, SessionSignal, SessionStore};

    fn gateway() -> (Arc<MockTransport>, ApiGateway<Arc<MockTransport>>) {
        let signal = SessionSignal::new();
        let store = SessionStore::init(MemoryStorage::new(), &signal);
        let transport = Arc::new(MockTransport::new());
        let gateway = ApiGateway::new("/api", Arc::clone(&transport), store.reader(), signal);
        (transport, gateway)
    }

    fn org(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "owner": 1,
            "name": name,
            "business_type": "retail",
            "employee_count": 4,
            "revenue_range": "under_1m",
            "work_style": "onsite",
            "downtime_impact": "medium",
            "primary_domain": "shop.example",
            "saas_stack": {},
            "created_at": "2025-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_orgs() {
        let (transport, gateway) = gateway();
        transport.respond_json(200, json!([org(1, "A"), org(2, "B")]));

        let orgs = gateway.list_orgs().await.unwrap();

        assert_eq!(orgs.len(), 2);
        assert_eq!(orgs[1].name, "B");
        assert_eq!(transport.last_request().url, "/api/orgs");
    }

    #[tokio::test]
    async fn test_create_and_update_org_payloads() {
        let (transport, gateway) = gateway();
        transport
            .respond_json(201, org(5, "New"))
            .respond_json(200, org(5, "Renamed"));

        let draft = OrganizationDraft {
            name: Some("New".to_string()),
            primary_domain: Some("new.example".to_string()),
            ..Default::default()
        };
        let created = gateway.create_org(&draft).await.unwrap();
        assert_eq!(created.id, 5);

        let rename = OrganizationDraft {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = gateway.update_org(5, &rename).await.unwrap();
        assert_eq!(updated.name, "Renamed");

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(
            requests[0].body.as_deref(),
            Some(r#"{"name":"New","primary_domain":"new.example"}"#)
        );
        assert_eq!(requests[1].method, Method::Put);
        assert_eq!(requests[1].url, "/api/orgs/5");
        assert_eq!(requests[1].body.as_deref(), Some(r#"{"name":"Renamed"}"#));
    }

    #[tokio::test]
    async fn test_dashboard_with_and_without_assessment() {
        let (transport, gateway) = gateway();
        transport.respond_json(
            200,
            json!([
                {
                    "id": 1, "name": "A", "primary_domain": "a.example", "business_type": "retail",
                    "latest_assessment": {"score": 72, "risk_band": "Moderate", "answers": {"mfa_all": "yes"}}
                },
                {
                    "id": 2, "name": "B", "primary_domain": "b.example", "business_type": "legal",
                    "latest_assessment": null
                }
            ]),
        );

        let summary = gateway.dashboard_summary().await.unwrap();

        assert_eq!(summary[0].latest_assessment.as_ref().map(|a| a.score), Some(72));
        assert!(summary[1].latest_assessment.is_none());
    }

    #[tokio::test]
    async fn test_scan_and_report_paths() {
        let (transport, gateway) = gateway();
        transport
            .respond_json(
                200,
                json!({"id": 3, "organization": 9, "scanned_at": "2025-01-01T00:00:00Z", "overall_scan_status": "ok"}),
            )
            .respond_json(
                200,
                json!({
                    "id": 4, "organization": 9, "generated_at": "2025-01-01T00:00:00Z",
                    "summary": "s", "top_risks": ["r"],
                    "recommendations": [{"title": "t", "steps": ["x"]}]
                }),
            );

        let scan = gateway.run_scan(9).await.unwrap();
        let report = gateway.generate_report(9).await.unwrap();

        assert_eq!(scan.overall_scan_status, "ok");
        assert_eq!(report.recommendations[0].steps, vec!["x".to_string()]);

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["/api/orgs/9/scan", "/api/orgs/9/generate-report"]);
    }
}
