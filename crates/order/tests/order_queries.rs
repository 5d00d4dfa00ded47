mod common;

use common::{Harness, harness};
use order::{
    abstract_trait::{
        order::service::{OrderCommandServiceTrait, OrderQueryServiceTrait},
        order_item::service::OrderItemQueryServiceTrait,
    },
    domain::requests::order::{CreateOrderItemRequest, CreateOrderRequest, FindAllOrder},
};
use shared::errors::{ErrorKind, ServiceError};

fn page(page: i32, page_size: i32) -> FindAllOrder {
    FindAllOrder {
        search: String::new(),
        page,
        page_size,
    }
}

async fn seed_orders(h: &Harness, count: usize) -> Vec<i32> {
    h.store.add_product(10, 100, 1_000);

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let response = h
            .command()
            .create_order(&CreateOrderRequest {
                merchant_id: 1,
                cashier_id: 1,
                items: vec![CreateOrderItemRequest {
                    product_id: 10,
                    quantity: 1,
                }],
            })
            .await
            .expect("seed order");
        ids.push(response.data.id);
    }
    ids
}

#[tokio::test]
async fn find_all_pages_through_orders() {
    let h = harness();
    seed_orders(&h, 5).await;

    let first = h.query().find_all(&page(1, 2)).await.expect("first page");
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.pagination.total_items, 5);
    assert_eq!(first.pagination.total_pages, 3);

    let last = h.query().find_all(&page(3, 2)).await.expect("last page");
    assert_eq!(last.data.len(), 1);
}

#[tokio::test]
async fn active_and_trashed_views_split_the_orders() {
    let h = harness();
    let ids = seed_orders(&h, 3).await;
    h.command().trashed_order(ids[0]).await.expect("trash");

    let active = h.query().find_by_active(&page(1, 10)).await.expect("active");
    let trashed = h
        .query()
        .find_by_trashed(&page(1, 10))
        .await
        .expect("trashed");
    let all = h.query().find_all(&page(1, 10)).await.expect("all");

    assert_eq!(active.pagination.total_items, 2);
    assert!(active.data.iter().all(|o| o.deleted_at.is_none()));
    assert_eq!(trashed.pagination.total_items, 1);
    assert_eq!(trashed.data[0].id, ids[0]);
    assert!(trashed.data[0].deleted_at.is_some());
    assert_eq!(all.pagination.total_items, 3);
}

#[tokio::test]
async fn empty_listing_has_no_pages() {
    let h = harness();

    let response = h.query().find_all(&page(1, 10)).await.expect("listing");

    assert!(response.data.is_empty());
    assert_eq!(response.pagination.total_pages, 0);
}

#[tokio::test]
async fn far_page_is_empty_rather_than_an_error() {
    let h = harness();
    seed_orders(&h, 2).await;

    let response = h
        .query()
        .find_all(&page(30_000_000, 100))
        .await
        .expect("far page");

    assert!(response.data.is_empty());
    assert_eq!(response.pagination.total_items, 2);
    assert_eq!(response.pagination.total_pages, 1);
}

#[tokio::test]
async fn invalid_page_size_fails_validation() {
    let h = harness();

    let err = h.query().find_all(&page(1, 0)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn find_by_id_serves_repeat_reads_from_cache() {
    let h = harness();
    let ids = seed_orders(&h, 1).await;

    let first = h.query().find_by_id(ids[0]).await.expect("read");
    assert!(h.cache.contains(&format!("order:find_by_id:{}", ids[0])));

    h.store.fail_on("find_order");
    let second = h.query().find_by_id(ids[0]).await.expect("cached read");

    assert_eq!(first.data.id, second.data.id);
    assert_eq!(second.data.total_price, 100);
}

#[tokio::test]
async fn find_by_id_reports_missing_orders() {
    let h = harness();

    let err = h.query().find_by_id(404).await.unwrap_err();

    assert!(matches!(err, ServiceError::OrderNotFound(404)));
    assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
}

#[tokio::test]
async fn order_items_listing_includes_trashed_items() {
    let h = harness();
    let ids = seed_orders(&h, 1).await;
    h.command().trashed_order(ids[0]).await.expect("trash");

    let items = h
        .items()
        .find_order_item_by_order(ids[0])
        .await
        .expect("items");

    assert_eq!(items.data.len(), 1);
    assert_eq!(items.data[0].order_id, ids[0]);
    assert_eq!(items.data[0].price, 100);
    assert!(items.data[0].deleted_at.is_some());
}
