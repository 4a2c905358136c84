use crate::instrument;
use crate::transport::{ApiResponse, HttpTransport};
use analysis_probe_instruments::Reporter;
use std::sync::Arc;
use url::Url;

/// Instrumented client for the Gremlin HTTP endpoint of the graph database.
#[derive(Clone)]
pub struct GremlinApi {
    url: Url,
    transport: Arc<dyn HttpTransport>,
    reporter: Option<Arc<Reporter>>,
}

/// Quote a value as a Gremlin string literal.
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl GremlinApi {
    pub fn new(url: Url, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            url,
            transport,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    fn query(&self, operation_id: &str, query: String) -> anyhow::Result<ApiResponse> {
        instrument(self.reporter.as_deref(), operation_id, || {
            log::trace!("Gremlin query: {query}");
            self.transport
                .post_json(&self.url, &[], &serde_json::json!({ "gremlin": query }))
        })
    }

    /// Look up the package vertex of `package` in `ecosystem`.
    pub fn package_query(&self, ecosystem: &str, package: &str) -> anyhow::Result<ApiResponse> {
        self.query(
            "gremlin.package_query",
            format!(
                "g.V().has('ecosystem', {}).has('name', {})",
                literal(ecosystem),
                literal(package)
            ),
        )
    }

    /// Look up the version vertex of `package` `version` in `ecosystem`.
    pub fn package_version_query(
        &self,
        ecosystem: &str,
        package: &str,
        version: &str,
    ) -> anyhow::Result<ApiResponse> {
        self.query(
            "gremlin.package_version_query",
            format!(
                "g.V().has('pecosystem', {}).has('pname', {}).has('version', {})",
                literal(ecosystem),
                literal(package),
                literal(version)
            ),
        )
    }

    /// A Gremlin response is valid when both the HTTP status and the status code reported in the
    /// body are 200.
    pub fn check_gremlin_response(response: &ApiResponse) -> bool {
        if response.status != 200 {
            return false;
        }

        response
            .json()
            .ok()
            .and_then(|body| body.pointer("/status/code").and_then(|c| c.as_u64()))
            == Some(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedTransport;
    use pretty_assertions::assert_eq;

    #[test]
    fn package_version_query_is_posted() {
        let transport = Arc::new(ScriptedTransport::new().with_response(200, "{}"));
        let api = GremlinApi::new(
            Url::parse("http://gremlin.test:8182/").unwrap(),
            transport.clone(),
        );

        api.package_version_query("pypi", "clojure_py", "0.2.4").unwrap();

        assert_eq!(
            Some(serde_json::json!({
                "gremlin": "g.V().has('pecosystem', 'pypi').has('pname', 'clojure_py').has('version', '0.2.4')"
            })),
            transport.requests()[0].body
        );
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(r"'it\'s'", literal("it's"));
    }

    #[test]
    fn response_check_needs_ok_status_in_body() {
        let ok = ApiResponse::new(200, r#"{"status": {"code": 200}, "result": {"data": []}}"#);
        let bad_body = ApiResponse::new(200, r#"{"status": {"code": 597}}"#);
        let bad_status = ApiResponse::new(500, r#"{"status": {"code": 200}}"#);

        assert!(GremlinApi::check_gremlin_response(&ok));
        assert!(!GremlinApi::check_gremlin_response(&bad_body));
        assert!(!GremlinApi::check_gremlin_response(&bad_status));
        assert!(!GremlinApi::check_gremlin_response(&ApiResponse::new(200, "not json")));
    }
}
