//! Mock collaborators shared by the integration tests.
//!
//! The mock index implements enough query semantics (text match, filters,
//! sort, pagination) to exercise the service façade end to end without a
//! running engine.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use property_search::client::{FetchError, PropertyFetcher};
use property_search::service::SearchService;
use property_search_repository::{CacheRepository, SearchIndexError, SearchIndexRepository};
use property_search_shared::{CachedPage, Property, SearchRequest};

/// In-memory search index keyed by property id.
pub struct MockIndex {
    documents: Mutex<BTreeMap<String, Property>>,
    pub search_calls: AtomicUsize,
    pub fail_search: AtomicBool,
    pub fail_mutations: AtomicBool,
}

impl MockIndex {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            search_calls: AtomicUsize::new(0),
            fail_search: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
        }
    }

    pub fn document(&self, id: &str) -> Option<Property> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    fn matches(property: &Property, request: &SearchRequest) -> bool {
        if !request.query.is_empty() {
            let term = request.query.as_str();
            if !(property.title.contains(term)
                || property.city.contains(term)
                || property.country.contains(term))
            {
                return false;
            }
        }
        if !request.city.is_empty() && property.city != request.city {
            return false;
        }
        if !request.country.is_empty() && property.country != request.country {
            return false;
        }
        if request.min_price > 0.0 || request.max_price > 0.0 {
            let max_price = if request.max_price > 0.0 {
                request.max_price
            } else {
                f64::MAX
            };
            if property.price_per_night < request.min_price
                || property.price_per_night > max_price
            {
                return false;
            }
        }
        if request.bedrooms > 0 && property.bedrooms != request.bedrooms {
            return false;
        }
        if request.bathrooms > 0 && property.bathrooms != request.bathrooms {
            return false;
        }
        if request.min_guests > 0 && property.max_guests < request.min_guests {
            return false;
        }
        true
    }
}

#[async_trait]
impl SearchIndexRepository for MockIndex {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<(Vec<Property>, usize), SearchIndexError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(SearchIndexError::query("mock engine down"));
        }

        let documents = self.documents.lock().unwrap();
        let mut matching: Vec<Property> = documents
            .values()
            .filter(|p| Self::matches(p, request))
            .cloned()
            .collect();

        match request.sort_by.as_str() {
            "price" => matching.sort_by(|a, b| {
                a.price_per_night.partial_cmp(&b.price_per_night).unwrap()
            }),
            "created_at" => matching.sort_by_key(|p| p.created_at),
            "bedrooms" => matching.sort_by_key(|p| p.bedrooms),
            _ => {}
        }
        if request.sort_order == "desc" {
            matching.reverse();
        }

        let total = matching.len();
        let start = (request.page as u64 - 1) * request.page_size as u64;
        let page: Vec<Property> = matching
            .into_iter()
            .skip(start as usize)
            .take(request.page_size as usize)
            .collect();

        Ok((page, total))
    }

    async fn index(&self, property: &Property) -> Result<(), SearchIndexError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(SearchIndexError::index("mock engine down"));
        }
        self.documents
            .lock()
            .unwrap()
            .insert(property.id.clone(), property.clone());
        Ok(())
    }

    async fn update(&self, property: &Property) -> Result<(), SearchIndexError> {
        self.index(property).await
    }

    async fn delete(&self, property_id: &str) -> Result<(), SearchIndexError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(SearchIndexError::delete("mock engine down"));
        }
        self.documents.lock().unwrap().remove(property_id);
        Ok(())
    }
}

/// In-memory cache without TTL handling.
pub struct MockCache {
    pages: Mutex<HashMap<String, CachedPage>>,
    pub invalidations: AtomicUsize,
}

impl MockCache {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            invalidations: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.lock().unwrap().len()
    }
}

#[async_trait]
impl CacheRepository for MockCache {
    async fn get(&self, key: &str) -> Option<CachedPage> {
        self.pages.lock().unwrap().get(key).cloned()
    }

    async fn set(&self, key: &str, page: CachedPage, _ttl: Duration) {
        self.pages.lock().unwrap().insert(key.to_string(), page);
    }

    async fn invalidate_all(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.pages.lock().unwrap().clear();
    }
}

/// Upstream stand-in serving properties from a map.
pub struct MockFetcher {
    records: Mutex<HashMap<String, Property>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, property: Property) {
        self.records
            .lock()
            .unwrap()
            .insert(property.id.clone(), property);
    }
}

#[async_trait]
impl PropertyFetcher for MockFetcher {
    async fn fetch(&self, property_id: &str) -> Result<Property, FetchError> {
        self.records
            .lock()
            .unwrap()
            .get(property_id)
            .cloned()
            .ok_or(FetchError::StatusError {
                status: 404,
                body: "property not found".to_string(),
            })
    }
}

/// Build a service wired to fresh mocks.
pub fn mock_service() -> (
    Arc<SearchService>,
    Arc<MockIndex>,
    Arc<MockCache>,
    Arc<MockFetcher>,
) {
    let index = Arc::new(MockIndex::new());
    let cache = Arc::new(MockCache::new());
    let fetcher = Arc::new(MockFetcher::new());
    let service = Arc::new(SearchService::new(
        index.clone(),
        cache.clone(),
        fetcher.clone(),
    ));
    (service, index, cache, fetcher)
}

/// A property with sensible defaults for tests.
pub fn property(id: &str, title: &str, city: &str, price: f64) -> Property {
    Property {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} in {city}"),
        city: city.to_string(),
        country: "Colombia".to_string(),
        price_per_night: price,
        bedrooms: 2,
        bathrooms: 1,
        max_guests: 4,
        images: Vec::new(),
        owner_id: 1,
        available: true,
        created_at: Utc::now(),
    }
}
