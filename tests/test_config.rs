//! Configuration tests: backend parsing and environment lookup.

use catalog_client::config::{API_KEY_ENV, BACKEND_ENV, DEFAULT_LOCAL_URL, URL_ENV};
use catalog_client::{Backend, CatalogError, ClientConfig};
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn backend_parses_aliases() {
    assert_eq!("local".parse::<Backend>().unwrap(), Backend::LocalRest);
    assert_eq!("Document".parse::<Backend>().unwrap(), Backend::DocumentStore);
    assert_eq!("document-store".parse::<Backend>().unwrap(), Backend::DocumentStore);
    assert_eq!(" hosted ".parse::<Backend>().unwrap(), Backend::HostedRest);
    assert!(matches!(
        "graphql".parse::<Backend>(),
        Err(CatalogError::InvalidInput(_))
    ));
}

#[test]
fn empty_environment_means_local_defaults() {
    let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.backend, Backend::LocalRest);
    assert!(config.api_key.is_none());
    assert_eq!(config.collection_url().unwrap(), DEFAULT_LOCAL_URL);
}

#[test]
fn environment_overrides_are_read() {
    let config = ClientConfig::from_lookup(lookup(&[
        (BACKEND_ENV, "hosted"),
        (URL_ENV, "https://api.example.com/products/"),
        (API_KEY_ENV, "secret"),
    ]))
    .unwrap();
    assert_eq!(config.backend, Backend::HostedRest);
    assert_eq!(config.api_key.as_deref(), Some("secret"));
    assert_eq!(
        config.collection_url().unwrap(),
        "https://api.example.com/products"
    );
}

#[test]
fn blank_values_count_as_unset() {
    let config = ClientConfig::from_lookup(lookup(&[(API_KEY_ENV, "  "), (BACKEND_ENV, "")]))
        .unwrap();
    assert!(config.api_key.is_none());
    assert_eq!(config.backend, Backend::LocalRest);
}

#[test]
fn remote_backends_require_a_url() {
    let config = ClientConfig::from_lookup(lookup(&[(BACKEND_ENV, "document")])).unwrap();
    assert!(matches!(
        config.collection_url(),
        Err(CatalogError::InvalidInput(_))
    ));
}

#[test]
fn credential_header_depends_on_backend() {
    assert_eq!(Backend::LocalRest.credential_header("k"), None);
    assert_eq!(
        Backend::DocumentStore.credential_header("k"),
        Some(("X-Master-Key", "k".to_string()))
    );
    assert_eq!(
        Backend::HostedRest.credential_header("k"),
        Some(("Authorization", "Bearer k".to_string()))
    );
}

#[test]
fn only_hosted_supports_edit_and_delete() {
    assert!(Backend::HostedRest.supports_edit());
    assert!(Backend::HostedRest.supports_delete());
    for backend in [Backend::LocalRest, Backend::DocumentStore] {
        assert!(!backend.supports_edit());
        assert!(!backend.supports_delete());
        assert!(!backend.notifies());
    }
}

#[test]
fn today_is_a_calendar_date() {
    let today = catalog_client::config::today();
    let parts: Vec<&str> = today.split('-').collect();
    assert_eq!(parts.len(), 3, "{today}");
    assert_eq!(parts[0].len(), 4);
    assert_eq!(parts[1].len(), 2);
    assert_eq!(parts[2].len(), 2);
    assert!(parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())));
}
