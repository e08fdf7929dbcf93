//! Integration tests for the resolver backends.
//!
//! The HTTP resolver runs against a local wiremock server; the file
//! resolver against a temp directory.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seedtree::core::thing::{Common, Feature, Thing};
use seedtree::core::types::{Address, ThingType};
use seedtree::resolver::{
    create_resolver, CachingResolver, FileResolver, HttpResolver, ResolutionError, Resolver,
    ResolverKind, ResolverSettings,
};

fn addr(s: &str) -> Address {
    Address::new(s).unwrap()
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/api/thing", server.uri())
}

// =============================================================================
// HTTP resolver
// =============================================================================

#[tokio::test]
async fn http_posts_form_and_decodes_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/thing"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("address=leaf1"))
        .and(body_string_contains("type=1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"address":"leaf1","type":1,"data":"hello"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = HttpResolver::with_default_timeout(endpoint(&server)).unwrap();
    let thing = resolver.resolve(&addr("leaf1"), ThingType::Text).await.unwrap();

    assert_eq!(thing.address(), &addr("leaf1"));
    assert_eq!(thing.data_string(), "hello");
}

#[tokio::test]
async fn http_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resolver = HttpResolver::with_default_timeout(endpoint(&server)).unwrap();
    let result = resolver.resolve(&addr("ghost"), ThingType::Text).await;

    assert_eq!(result, Err(ResolutionError::NotFound(addr("ghost"))));
}

#[tokio::test]
async fn http_500_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let resolver = HttpResolver::with_default_timeout(endpoint(&server)).unwrap();
    let result = resolver.resolve(&addr("x"), ThingType::Text).await;

    assert_eq!(
        result,
        Err(ResolutionError::Status {
            address: addr("x"),
            status: 500,
            message: "database offline".to_string(),
        })
    );
}

#[tokio::test]
async fn http_malformed_body_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let resolver = HttpResolver::with_default_timeout(endpoint(&server)).unwrap();
    let result = resolver.resolve(&addr("x"), ThingType::Text).await;

    assert!(matches!(result, Err(ResolutionError::Malformed { .. })));
}

#[tokio::test]
async fn http_record_for_other_address_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"address":"impostor","type":1,"data":"x"}"#),
        )
        .mount(&server)
        .await;

    let resolver = HttpResolver::with_default_timeout(endpoint(&server)).unwrap();
    let result = resolver.resolve(&addr("real"), ThingType::Text).await;

    assert!(matches!(result, Err(ResolutionError::Malformed { .. })));
}

#[tokio::test]
async fn http_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"address":"slow","type":1,"data":"late"}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(200);
    let resolver = HttpResolver::new(endpoint(&server), timeout).unwrap();
    let result = resolver.resolve(&addr("slow"), ThingType::Text).await;

    assert_eq!(
        result,
        Err(ResolutionError::Timeout {
            address: addr("slow"),
            after: timeout,
        })
    );
}

// =============================================================================
// File resolver
// =============================================================================

#[tokio::test]
async fn file_store_then_resolve_every_variant() {
    let temp = TempDir::new().unwrap();
    let resolver = FileResolver::new(temp.path());

    let things = vec![
        Thing::container(
            Common::at(addr("box")),
            vec![Feature::new(0, addr("t")).with_type(ThingType::Text)],
        ),
        Thing::text(Common::at(addr("t")), "words"),
        Thing::number(Common::at(addr("n")), 42.0),
        Thing::image(Common::at(addr("i")), vec![0x89, 0x50, 0x4e, 0x47]),
    ];
    for thing in &things {
        resolver.store(thing).unwrap();
    }

    for thing in &things {
        let resolved = resolver
            .resolve(thing.address(), thing.thing_type())
            .await
            .unwrap();
        assert_eq!(&resolved, thing);
    }
}

#[tokio::test]
async fn file_resolver_reads_hand_written_record() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("leaf1.json"),
        r#"{"address":"leaf1","type":1,"data":"hello"}"#,
    )
    .unwrap();

    let resolver = FileResolver::new(temp.path());
    let thing = resolver.resolve(&addr("leaf1"), ThingType::Text).await.unwrap();
    assert_eq!(thing.data_string(), "hello");
}

// =============================================================================
// Factory and cache
// =============================================================================

#[tokio::test]
async fn factory_cache_wraps_http_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"address":"a","type":2,"data":1.5}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = create_resolver(&ResolverSettings {
        kind: ResolverKind::Http,
        store_dir: "unused".into(),
        endpoint: endpoint(&server),
        timeout: Duration::from_secs(5),
        cache: true,
    })
    .unwrap();

    for _ in 0..3 {
        let thing = resolver.resolve(&addr("a"), ThingType::Number).await.unwrap();
        assert_eq!(thing.data_string(), "1.500000");
    }
    // `expect(1)` is verified when the server drops
}

#[tokio::test]
async fn cache_counts_hits_over_file_backend() {
    let temp = TempDir::new().unwrap();
    let backend = FileResolver::new(temp.path());
    backend
        .store(&Thing::text(Common::at(addr("a")), "cached"))
        .unwrap();

    let cache = CachingResolver::new(Arc::new(backend));
    for _ in 0..4 {
        cache.resolve(&addr("a"), ThingType::Text).await.unwrap();
    }

    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 3);
}
