use std::sync::Arc;

use caduceus_application::{PrivilegeRepository, PrivilegeResolver, ResolveError};
use caduceus_core::AppError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

use super::{RestPrivilegeRepository, in_filter};

const PRINCIPAL: &str = "H00000001";

fn repository(base: &str) -> RestPrivilegeRepository {
    let base_url = match Url::parse(base) {
        Ok(url) => url,
        Err(error) => panic!("test url must parse: {error}"),
    };
    let http_client = match reqwest::Client::builder().no_proxy().build() {
        Ok(client) => client,
        Err(error) => panic!("test client must build: {error}"),
    };
    RestPrivilegeRepository::new(http_client, base_url, "anon-key")
}

/// Answers a single request with a canned JSON response and hands back the request head.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (RestPrivilegeRepository, oneshot::Receiver<String>) {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind stub store: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("stub store has no address: {error}"),
    };
    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buffer = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buffer).await {
                Ok(0) | Err(_) => break,
                Ok(read) => request.extend_from_slice(&buffer[..read]),
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        let _ = sender.send(String::from_utf8_lossy(&request).into_owned());
    });

    (repository(format!("http://{address}").as_str()), receiver)
}

#[test]
fn in_filter_quotes_values() {
    assert_eq!(
        in_filter(&["a1".to_owned(), "b\"2".to_owned()]),
        "in.(\"a1\",\"b\\\"2\")"
    );
}

#[test]
fn assignments_url_filters_by_principal_and_active_flag() {
    let url = repository("https://store.example.com").assignments_url(PRINCIPAL);
    let Ok(url) = url else {
        panic!("assignment url must build");
    };

    assert_eq!(url.path(), "/rest/v1/role_assignments");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("platform_id".to_owned(), "eq.H00000001".to_owned())));
    assert!(pairs.contains(&("is_active".to_owned(), "eq.true".to_owned())));
}

#[test]
fn base_path_is_preserved() {
    let url = repository("https://gateway.example.com/tenant-a").roles_url(&["r1".to_owned()]);
    assert!(url.is_ok_and(|url| url.path() == "/tenant-a/rest/v1/roles"));
}

#[tokio::test]
async fn server_error_is_internal_error() {
    let (repository, _request) =
        serve_once("500 Internal Server Error", r#"{"message":"down"}"#).await;

    let listed = repository.list_active_assignments(PRINCIPAL).await;
    assert!(matches!(
        listed,
        Err(AppError::Internal(ref message)) if message.contains("500")
    ));
}

#[tokio::test]
async fn server_error_surfaces_as_assignment_lookup_failure() {
    let (repository, _request) =
        serve_once("500 Internal Server Error", r#"{"message":"down"}"#).await;
    let resolver = PrivilegeResolver::new(Arc::new(repository));

    let resolved = resolver.resolve(PRINCIPAL).await;
    assert!(matches!(
        resolved,
        Err(ResolveError::AssignmentLookup {
            ref principal_id,
            source: AppError::Internal(_),
        }) if principal_id == PRINCIPAL
    ));
}

#[tokio::test]
async fn non_array_body_is_decode_error() {
    let (repository, _request) = serve_once("200 OK", r#"{"message":"not a list"}"#).await;

    let listed = repository.list_active_assignments(PRINCIPAL).await;
    assert!(matches!(
        listed,
        Err(AppError::Internal(ref message)) if message.contains("failed to decode")
    ));
}

#[tokio::test]
async fn malformed_role_row_is_internal_error() {
    let (repository, _request) = serve_once(
        "200 OK",
        r#"[{"role_id":"r1","name":"staff","display_name":"Staff","rank":2,"privilege_level":"staff","permissions":[],"modules":null,"is_active":true}]"#,
    )
    .await;

    let listed = repository.list_role_definitions(&["r1".to_owned()]).await;
    assert!(matches!(
        listed,
        Err(AppError::Internal(ref message)) if message.contains("r1")
    ));
}

#[tokio::test]
async fn empty_listing_resolves_to_empty_snapshot() {
    let (repository, request) = serve_once("200 OK", "[]").await;
    let resolver = PrivilegeResolver::new(Arc::new(repository));

    let snapshot = match resolver.resolve(PRINCIPAL).await {
        Ok(snapshot) => snapshot,
        Err(error) => panic!("empty listing must resolve: {error}"),
    };
    assert!(snapshot.is_empty());
    assert!(snapshot.assignments().is_empty());
    assert_eq!(snapshot.highest_tier(), None);

    let request = match request.await {
        Ok(request) => request.to_ascii_lowercase(),
        Err(error) => panic!("stub store must capture the request: {error}"),
    };
    assert!(request.starts_with("get /rest/v1/role_assignments?"));
    assert!(request.contains("apikey: anon-key"));
    assert!(request.contains("authorization: bearer anon-key"));
}
