//! Integration tests for the service façade.
//!
//! These drive the real `SearchService` against mock collaborators to
//! verify the write path (fetch → validate → index → invalidate), the
//! cached read path, and the idempotency guarantees.

mod common;

use std::sync::atomic::Ordering;

use common::{mock_service, property};
use property_search::ServiceError;
use property_search_shared::SearchRequest;

#[tokio::test]
async fn test_ingest_then_query() {
    let (service, _index, _cache, fetcher) = mock_service();
    fetcher.insert(property("p1", "Loft", "Cali", 120.0));

    service.on_create("p1").await.unwrap();

    let request = SearchRequest {
        query: "Loft".to_string(),
        ..Default::default()
    };
    let response = service.search(request).await.unwrap();

    assert_eq!(response.total_results, 1);
    assert_eq!(response.results[0].id, "p1");
    assert_eq!(response.results[0].city, "Cali");
    assert_eq!(response.results[0].country, "Colombia");
    assert_eq!(response.results[0].price_per_night, 120.0);
}

#[tokio::test]
async fn test_update_replaces_document() {
    let (service, index, _cache, fetcher) = mock_service();
    fetcher.insert(property("p1", "Loft", "Cali", 120.0));
    service.on_create("p1").await.unwrap();

    // Upstream now carries new values for the same id.
    fetcher.insert(property("p1", "Big Loft", "Cali", 200.0));
    service.on_update("p1").await.unwrap();

    assert_eq!(index.len(), 1);
    let request = SearchRequest {
        query: "Loft".to_string(),
        ..Default::default()
    };
    let response = service.search(request).await.unwrap();
    assert_eq!(response.total_results, 1);
    assert_eq!(response.results[0].title, "Big Loft");
    assert_eq!(response.results[0].price_per_night, 200.0);
}

#[tokio::test]
async fn test_create_and_update_are_equivalent() {
    // With the same upstream record, create and update leave the index in
    // the same state.
    let (service_a, index_a, _cache_a, fetcher_a) = mock_service();
    let (service_b, index_b, _cache_b, fetcher_b) = mock_service();
    fetcher_a.insert(property("p1", "Loft", "Cali", 120.0));
    fetcher_b.insert(property("p1", "Loft", "Cali", 120.0));

    service_a.on_create("p1").await.unwrap();
    service_b.on_update("p1").await.unwrap();

    assert_eq!(index_a.document("p1"), index_b.document("p1"));
}

#[tokio::test]
async fn test_replayed_events_are_idempotent() {
    let (service, index, _cache, fetcher) = mock_service();
    fetcher.insert(property("p1", "Loft", "Cali", 120.0));

    service.on_create("p1").await.unwrap();
    let after_first = index.document("p1");
    service.on_create("p1").await.unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.document("p1"), after_first);

    service.on_delete("p1").await.unwrap();
    service.on_delete("p1").await.unwrap();
    assert_eq!(index.len(), 0);
}

#[tokio::test]
async fn test_delete_removes_from_results() {
    let (service, _index, _cache, fetcher) = mock_service();
    fetcher.insert(property("p1", "Loft", "Cali", 120.0));
    service.on_create("p1").await.unwrap();

    service.on_delete("p1").await.unwrap();

    let request = SearchRequest {
        query: "Loft".to_string(),
        ..Default::default()
    };
    let response = service.search(request).await.unwrap();
    assert_eq!(response.total_results, 0);
    assert!(response.results.is_empty());
}

#[tokio::test]
async fn test_delete_of_absent_id_succeeds() {
    let (service, _index, _cache, _fetcher) = mock_service();
    assert!(service.on_delete("ghost").await.is_ok());
}

#[tokio::test]
async fn test_second_search_is_served_from_cache() {
    let (service, index, _cache, fetcher) = mock_service();
    fetcher.insert(property("p1", "Loft", "Cali", 120.0));
    service.on_create("p1").await.unwrap();

    let request = SearchRequest {
        query: "Loft".to_string(),
        ..Default::default()
    };
    let first = service.search(request.clone()).await.unwrap();
    let second = service.search(request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(index.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_mutation_invalidates_cached_results() {
    let (service, _index, _cache, fetcher) = mock_service();
    fetcher.insert(property("p1", "Loft", "Cali", 120.0));
    service.on_create("p1").await.unwrap();

    let request = SearchRequest {
        query: "Loft".to_string(),
        ..Default::default()
    };
    let before = service.search(request.clone()).await.unwrap();
    assert_eq!(before.total_results, 1);

    // A new matching property arrives; the cached page must not survive.
    fetcher.insert(property("p2", "Harbor Loft", "Cartagena", 90.0));
    service.on_create("p2").await.unwrap();

    let after = service.search(request).await.unwrap();
    assert_eq!(after.total_results, 2);
    let ids: Vec<&str> = after.results.iter().map(|p| p.id.as_str()).collect();
    assert!(ids.contains(&"p1"));
    assert!(ids.contains(&"p2"));
}

#[tokio::test]
async fn test_failed_mutation_keeps_cache() {
    let (service, index, cache, fetcher) = mock_service();
    fetcher.insert(property("p1", "Loft", "Cali", 120.0));
    service.on_create("p1").await.unwrap();

    let request = SearchRequest {
        query: "Loft".to_string(),
        ..Default::default()
    };
    service.search(request).await.unwrap();
    assert_eq!(cache.len(), 1);

    index.fail_mutations.store(true, Ordering::SeqCst);
    fetcher.insert(property("p2", "Loft Two", "Cali", 80.0));
    let result = service.on_create("p2").await;
    assert!(matches!(result, Err(ServiceError::IndexFailed(_))));

    // Only successful mutations invalidate.
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_leaves_index_untouched() {
    let (service, index, _cache, _fetcher) = mock_service();

    let result = service.on_create("unknown").await;

    assert!(matches!(result, Err(ServiceError::FetchFailed(_))));
    assert_eq!(index.len(), 0);
}

#[tokio::test]
async fn test_invalid_upstream_record_is_rejected() {
    let (service, index, _cache, fetcher) = mock_service();
    let mut bad = property("p1", "Loft", "Cali", 120.0);
    bad.title = String::new();
    fetcher.insert(bad);

    let result = service.on_create("p1").await;

    assert!(matches!(result, Err(ServiceError::ValidationFailed(_))));
    assert_eq!(index.len(), 0);
}

#[tokio::test]
async fn test_filter_and_paginate() {
    let (service, _index, _cache, fetcher) = mock_service();
    // 25 properties in Bogotá, prices 10, 20, ..., 250.
    for i in 1..=25u32 {
        let id = format!("p{i:02}");
        fetcher.insert(property(&id, "Apartment", "Bogotá", (i * 10) as f64));
        service.on_create(&id).await.unwrap();
    }

    let request = SearchRequest {
        city: "Bogotá".to_string(),
        min_price: 50.0,
        max_price: 150.0,
        page: 2,
        page_size: 5,
        sort_by: "price".to_string(),
        sort_order: "asc".to_string(),
        ..Default::default()
    };
    let response = service.search(request).await.unwrap();

    // Prices 50..=150 in steps of 10 are 11 matches across 3 pages.
    assert_eq!(response.total_results, 11);
    assert_eq!(response.total_pages, 3);
    let prices: Vec<f64> = response
        .results
        .iter()
        .map(|p| p.price_per_night)
        .collect();
    assert_eq!(prices, vec![100.0, 110.0, 120.0, 130.0, 140.0]);
}

#[tokio::test]
async fn test_match_all_with_pagination() {
    let (service, _index, _cache, fetcher) = mock_service();
    for i in 1..=7u32 {
        let id = format!("p{i}");
        fetcher.insert(property(&id, "House", "Lima", (i * 10) as f64));
        service.on_create(&id).await.unwrap();
    }

    let request = SearchRequest {
        page_size: 3,
        page: 3,
        ..Default::default()
    };
    let response = service.search(request).await.unwrap();
    assert_eq!(response.total_results, 7);
    assert_eq!(response.total_pages, 3);
    assert_eq!(response.results.len(), 1);
}

#[tokio::test]
async fn test_concatenated_pages_reproduce_full_result_set() {
    let (service, _index, _cache, fetcher) = mock_service();
    for i in 1..=12u32 {
        let id = format!("p{i:02}");
        fetcher.insert(property(&id, "Studio", "Quito", (i * 5) as f64));
        service.on_create(&id).await.unwrap();
    }

    let mut seen: Vec<String> = Vec::new();
    for page in 1..=3u32 {
        let request = SearchRequest {
            page,
            page_size: 5,
            sort_by: "price".to_string(),
            ..Default::default()
        };
        let response = service.search(request).await.unwrap();
        assert_eq!(response.total_results, 12);
        seen.extend(response.results.iter().map(|p| p.id.clone()));
    }

    // No duplicates, no omissions.
    assert_eq!(seen.len(), 12);
    let mut deduped = seen.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 12);
}

#[tokio::test]
async fn test_page_zero_is_coerced() {
    let (service, _index, _cache, _fetcher) = mock_service();
    let request = SearchRequest {
        page: 0,
        ..Default::default()
    };
    let response = service.search(request).await.unwrap();
    assert_eq!(response.page, 1);
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let (service, _index, _cache, _fetcher) = mock_service();

    let oversized = SearchRequest {
        page_size: 101,
        ..Default::default()
    };
    assert!(matches!(
        service.search(oversized).await,
        Err(ServiceError::InvalidRequest(_))
    ));

    let inverted = SearchRequest {
        min_price: 200.0,
        max_price: 100.0,
        ..Default::default()
    };
    assert!(matches!(
        service.search(inverted).await,
        Err(ServiceError::InvalidRequest(_))
    ));

    let bad_order = SearchRequest {
        sort_order: "sideways".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        service.search(bad_order).await,
        Err(ServiceError::InvalidRequest(_))
    ));

    let bad_sort_field = SearchRequest {
        sort_by: "owner_id".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        service.search(bad_sort_field).await,
        Err(ServiceError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_engine_failure_surfaces_as_backend_error() {
    let (service, index, _cache, _fetcher) = mock_service();
    index.fail_search.store(true, Ordering::SeqCst);

    let result = service.search(SearchRequest::default()).await;
    assert!(matches!(result, Err(ServiceError::Backend(_))));
}
