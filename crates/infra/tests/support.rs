use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gradebridge_domain::RegistryConfig;
use gradebridge_infra::RegistryClient;
use serde_json::{json, Value};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const RESULTS_KEY: &str = "Resultat";
pub const SEARCH_ENDPOINT: &str = "/resultat/studieresultat/rapportera/utbildningsinstans/sok";

/// Registry client pointing at the mock server, without a client identity.
pub fn registry_for(server: &MockServer) -> RegistryClient {
    RegistryClient::new(&RegistryConfig {
        base_url: server.uri(),
        pfx_base64: None,
        pfx_passphrase: String::new(),
        timeout_secs: 5,
    })
    .expect("registry client should build")
}

/// Simulates the registry search protocol over `total` records named
/// `r0..r{total-1}`.
#[derive(Clone)]
pub struct PagedRegistry {
    total: u64,
    failing_page: Option<u64>,
    calls: Arc<AtomicUsize>,
}

impl PagedRegistry {
    pub fn new(total: u64) -> Self {
        Self { total, failing_page: None, calls: Arc::new(AtomicUsize::new(0)) }
    }

    /// Answer `page` (with the full page size) with HTTP 500.
    pub fn failing_on(mut self, page: u64) -> Self {
        self.failing_page = Some(page);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Respond for PagedRegistry {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some((page, limit)) = paging_of(request).filter(|(page, _)| *page > 0) else {
            return ResponseTemplate::new(400);
        };

        if limit > 1 && self.failing_page == Some(page) {
            return ResponseTemplate::new(500).set_body_string("registry exploded");
        }

        let start = (page - 1) * limit;
        let end = (start + limit).min(self.total);
        let items: Vec<Value> =
            (start..end).map(|n| json!({ "Uid": format!("r{n}") })).collect();

        ResponseTemplate::new(200)
            .set_body_json(json!({ "TotaltAntalPoster": self.total, RESULTS_KEY: items }))
    }
}

/// `(Page, Limit)` of a recorded search request.
pub fn paging_of(request: &Request) -> Option<(u64, u64)> {
    let body: Value = serde_json::from_slice(&request.body).ok()?;
    Some((body.get("Page")?.as_u64()?, body.get("Limit")?.as_u64()?))
}

/// `(Page, Limit)` of every request the server received, in order.
pub async fn recorded_paging(server: &MockServer) -> Vec<(u64, u64)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(paging_of)
        .collect()
}
