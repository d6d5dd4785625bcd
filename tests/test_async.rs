//! Async wrapper tests: concurrent stock changes and reconcile policies.

#![cfg(feature = "async")]

mod common;

use catalog_client::{
    AsyncCatalogClient, Backend, CatalogClient, ProductId, ReconcilePolicy, StockOutcome,
};
use common::{Call, FakeApi};
use std::time::Duration;

async fn loaded(policy: ReconcilePolicy, api: FakeApi) -> (AsyncCatalogClient<FakeApi>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let client = CatalogClient::builder()
        .backend(Backend::LocalRest)
        .state_dir(tmp.path())
        .reconcile(policy)
        .clock(common::fixed_today)
        .build_with_api(api)
        .unwrap();
    let client = AsyncCatalogClient::new(client);
    client.load().await.unwrap();
    (client, tmp)
}

fn lamp_api() -> FakeApi {
    let api = FakeApi::with_products(vec![common::product(7, "Desk Lamp", "", "home", 3)]);
    // The increment's answer (stock 4) arrives well after the decrement's.
    api.delay_stock_response(4, Duration::from_millis(300));
    api
}

/// Fire an increment, then a decrement while the increment is still in flight.
async fn race(client: &AsyncCatalogClient<FakeApi>) -> (StockOutcome, StockOutcome) {
    let id = ProductId::from(7);
    let slow = {
        let client = client.clone();
        let id = id.clone();
        tokio::spawn(async move { client.increase_stock(&id).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = client.decrease_stock(&id).await.unwrap();
    let slow = slow.await.unwrap().unwrap();
    (slow, fast)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn both_requests_are_in_flight_at_once() {
    let api = lamp_api();
    let (client, _tmp) = loaded(ReconcilePolicy::LastResponseWins, api.clone()).await;

    race(&client).await;

    // Both were planned from stock 3: neither waited for the other.
    let stocks: Vec<u32> = api
        .mutations()
        .into_iter()
        .map(|c| match c {
            Call::PatchStock(_, patch) => patch.stock,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(stocks, vec![4, 2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn last_response_wins_by_default() {
    let (client, _tmp) = loaded(ReconcilePolicy::LastResponseWins, lamp_api()).await;

    let (slow, fast) = race(&client).await;

    assert_eq!(fast, StockOutcome::Applied);
    assert_eq!(slow, StockOutcome::Applied);
    // The older request answered last, so its value sticks.
    assert_eq!(client.products().await.unwrap()[0].stock, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sequenced_policy_keeps_latest_issued() {
    let (client, _tmp) = loaded(ReconcilePolicy::Sequenced, lamp_api()).await;

    let (slow, fast) = race(&client).await;

    assert_eq!(fast, StockOutcome::Applied);
    assert_eq!(slow, StockOutcome::Discarded);
    assert_eq!(client.products().await.unwrap()[0].stock, 2);
    assert!(client.content().await.unwrap().contains("Stock: 2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_create_appends_product() {
    let (client, _tmp) = loaded(ReconcilePolicy::LastResponseWins, lamp_api()).await;
    client
        .run(|c| {
            let form = c.form_mut();
            form.name = "Widget".into();
            form.price = "9.99".into();
            form.stock = "5".into();
            Ok(())
        })
        .await
        .unwrap();

    let created = client.create().await.unwrap();
    let products = client.products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1], created);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_decrement_at_zero_is_skipped() {
    let api = FakeApi::with_products(vec![common::product(2, "Hose", "", "garden", 0)]);
    let (client, _tmp) = loaded(ReconcilePolicy::LastResponseWins, api.clone()).await;

    let outcome = client.decrease_stock(&ProductId::from(2)).await.unwrap();
    assert_eq!(outcome, StockOutcome::Skipped);
    assert!(api.mutations().is_empty());
}
