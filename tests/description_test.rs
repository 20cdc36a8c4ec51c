//! Wiremock integration tests for [`HttpDescriptionSource`] and the
//! description cache running against it.

use std::sync::Arc;

use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use parliament_opensearch::{
    ClientConfig, DescriptionCache, DescriptionSource, HttpDescriptionSource, OpenSearchError,
};

const DESCRIPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OpenSearchDescription xmlns="http://a9.com/-/spec/opensearch/1.1/">
  <ShortName>Parliament Search</ShortName>
  <Description>Search UK Parliament</Description>
  <Url type="text/html" template="http://beta.parliament.uk/search?q={searchTerms}&amp;start_index={startIndex?}&amp;count={count?}"/>
</OpenSearchDescription>"#;

/// A JSON description body, as some services return by mistake.
const JSON_DESCRIPTION: &str =
    r#"{"url": [{"type": "text/html", "template": "http://x/?q={searchTerms}"}]}"#;

fn source() -> HttpDescriptionSource {
    HttpDescriptionSource::new(&ClientConfig::new()).unwrap()
}

async fn mount_description(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/description"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

// =============================================================================
// Successful fetch
// =============================================================================

#[tokio::test]
async fn fetches_and_parses_templates() {
    let server = MockServer::start().await;
    mount_description(&server, DESCRIPTION).await;

    let templates = source()
        .fetch_templates(&format!("{}/description", server.uri()), None)
        .await
        .unwrap();

    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].content_type(), "text/html");
    assert_eq!(
        templates[0].template(),
        "http://beta.parliament.uk/search?q={searchTerms}&start_index={startIndex?}&count={count?}"
    );
}

#[tokio::test]
async fn sends_opensearch_accept_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/description"))
        .and(header("Accept", "application/opensearchdescription+xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIPTION))
        .expect(1)
        .mount(&server)
        .await;

    source()
        .fetch_templates(&format!("{}/description", server.uri()), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn sends_configured_and_tracing_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/description"))
        .and(header("Ocp-Apim-Subscription-Key", "SECRET"))
        .and(header("Api-Version", "Staging"))
        .and(header("Request-Id", "|1234abcd."))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIPTION))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .auth_token("SECRET")
        .api_version("Staging");
    let source = HttpDescriptionSource::new(&config).unwrap();

    source
        .fetch_templates(&format!("{}/description", server.uri()), Some("|1234abcd."))
        .await
        .unwrap();
}

#[tokio::test]
async fn omits_unconfigured_headers() {
    let server = MockServer::start().await;
    mount_description(&server, DESCRIPTION).await;

    source()
        .fetch_templates(&format!("{}/description", server.uri()), None)
        .await
        .unwrap();

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("Ocp-Apim-Subscription-Key"));
    assert!(!requests[0].headers.contains_key("Request-Id"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn invalid_uri_fails_before_any_request() {
    let err = source()
        .fetch_templates("not a valid URI!", None)
        .await
        .unwrap_err();

    assert!(matches!(err, OpenSearchError::InvalidUri { ref uri, .. } if uri == "not a valid URI!"));
    assert!(err.is_description_error());
}

#[tokio::test]
async fn json_body_is_not_xml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/description.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JSON_DESCRIPTION, "application/json"))
        .mount(&server)
        .await;

    let uri = format!("{}/description.json", server.uri());
    let err = source().fetch_templates(&uri, None).await.unwrap_err();

    assert!(matches!(err, OpenSearchError::NotXml { .. }));
    assert_eq!(err.uri(), Some(uri.as_str()));
}

#[tokio::test]
async fn xml_without_url_nodes_is_missing_template_node() {
    let server = MockServer::start().await;
    mount_description(
        &server,
        r#"<OpenSearchDescription><ShortName>Empty</ShortName></OpenSearchDescription>"#,
    )
    .await;

    let err = source()
        .fetch_templates(&format!("{}/description", server.uri()), None)
        .await
        .unwrap_err();

    assert!(matches!(err, OpenSearchError::MissingTemplateNode { .. }));
}

#[tokio::test]
async fn http_errors_propagate_as_transport_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/description"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = source()
        .fetch_templates(&format!("{}/description", server.uri()), None)
        .await
        .unwrap_err();

    match err {
        OpenSearchError::Http(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(404)),
        other => panic!("expected Http error, got {other:?}"),
    }
}

// =============================================================================
// Cache over HTTP
// =============================================================================

#[tokio::test]
async fn cache_fetches_description_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/description"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIPTION))
        .expect(1)
        .mount(&server)
        .await;

    let cache = DescriptionCache::from_config(&ClientConfig::new()).unwrap();
    let uri = format!("{}/description", server.uri());

    let first = cache.fetch(&uri).await.unwrap();
    let second = cache.fetch(&uri).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn cache_refetches_after_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/description"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIPTION))
        .expect(2)
        .mount(&server)
        .await;

    let cache = DescriptionCache::from_config(&ClientConfig::new()).unwrap();
    let uri = format!("{}/description", server.uri());

    cache.fetch(&uri).await.unwrap();
    assert!(cache.delete(&uri).is_some());
    cache.fetch(&uri).await.unwrap();
}

#[tokio::test]
async fn cache_forwards_request_id_on_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/description"))
        .and(header_exists("Request-Id"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIPTION))
        .expect(1)
        .mount(&server)
        .await;

    let cache = DescriptionCache::from_config(&ClientConfig::new()).unwrap();
    cache
        .fetch_with_request_id(&format!("{}/description", server.uri()), Some("|abc."))
        .await
        .unwrap();
}

#[tokio::test]
async fn cache_stays_empty_after_parse_failure() {
    let server = MockServer::start().await;
    mount_description(&server, "{\"not\": \"xml\"}").await;

    let cache = DescriptionCache::from_config(&ClientConfig::new()).unwrap();
    let result = cache
        .fetch(&format!("{}/description", server.uri()))
        .await;

    assert!(matches!(result, Err(OpenSearchError::NotXml { .. })));
    assert!(cache.is_empty());
}
