use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// DoH endpoint URL for a mock server, in the form the resolver expects.
pub fn doh_url(server: &MockServer) -> String {
    format!("{}/dns-query", server.uri())
}

fn doh_response(domain: &str, record_type: u16, answers: Vec<serde_json::Value>) -> ResponseTemplate {
    let body = serde_json::json!({
        "Status": 0,
        "TC": false,
        "RD": true,
        "RA": true,
        "AD": false,
        "CD": false,
        "Question": [{
            "name": domain,
            "type": record_type
        }],
        "Answer": answers
    });

    ResponseTemplate::new(200)
        .set_body_json(body)
        .insert_header("content-type", "application/dns-json")
}

/// Mount a CNAME answer for one domain. DoH data fields carry the trailing
/// dot, as real servers do.
pub async fn mount_cname_answer(server: &MockServer, domain: &str, cnames: &[&str]) {
    let answers: Vec<serde_json::Value> = cnames
        .iter()
        .map(|cname| {
            serde_json::json!({
                "name": domain,
                "type": 5,
                "TTL": 300,
                "data": format!("{}.", cname)
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", domain))
        .and(query_param("type", "CNAME"))
        .respond_with(doh_response(domain, 5, answers))
        .mount(server)
        .await;
}

/// Mount an A answer for one domain, for existence probing.
pub async fn mount_a_answer(server: &MockServer, domain: &str, addresses: &[&str]) {
    let answers: Vec<serde_json::Value> = addresses
        .iter()
        .map(|address| {
            serde_json::json!({
                "name": domain,
                "type": 1,
                "TTL": 300,
                "data": address
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", domain))
        .and(query_param("type", "A"))
        .respond_with(doh_response(domain, 1, answers))
        .mount(server)
        .await;
}

/// Catch-all: any remaining DoH query gets a healthy empty answer. Mount
/// this after the specific answers; wiremock matches in mount order.
pub async fn mount_empty_answer(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .respond_with(doh_response("", 5, Vec::new()))
        .mount(server)
        .await;
}

/// Start a DoH mock server with the given per-domain CNAME answers and an
/// empty-answer fallback for everything else.
pub async fn mock_doh_cname_server(answers: &[(&str, &[&str])]) -> MockServer {
    let server = MockServer::start().await;
    for (domain, cnames) in answers {
        mount_cname_answer(&server, domain, cnames).await;
    }
    mount_empty_answer(&server).await;
    server
}

/// Mock crt.sh endpoint returning the given JSON body for every query.
pub async fn mock_crtsh_server(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    server
}

/// Mock crt.sh endpoint that always returns the given error status.
pub async fn mock_crtsh_error_server(status_code: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status_code))
        .mount(&server)
        .await;

    server
}
