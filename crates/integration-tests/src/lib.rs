//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed: [`CatalogServer`] serves the catalog's
//! `products/{id}` and `stock/{id}` endpoints from memory on an ephemeral
//! localhost port.
//!
//! # Test Categories
//!
//! - `http_catalog` - `HttpCatalog` against the fake server (status codes, caching)
//! - `cart_store` - `CartStore` end to end with `HttpCatalog` and `FileStorage`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rocketshoes_storefront::config::CatalogConfig;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// In-memory catalog served over HTTP.
pub struct CatalogServer {
    base_url: Url,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct ServerState {
    products: Mutex<HashMap<i32, Value>>,
    stock: Mutex<HashMap<i32, u32>>,
    product_hits: AtomicUsize,
    stock_hits: AtomicUsize,
    stock_fault: Mutex<StockFault>,
}

/// How the stock endpoint misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockFault {
    /// Serve stock normally.
    #[default]
    None,
    /// Answer 500 with a plain-text body.
    ServerError,
    /// Answer 201 with a valid stock body.
    Created,
    /// Answer 200 with an empty body.
    EmptyBody,
}

impl CatalogServer {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::default());

        let app = Router::new()
            .route("/products/{id}", get(product))
            .route("/stock/{id}", get(stock))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind catalog listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Catalog server error");
        });

        let base_url = Url::parse(&format!("http://{addr}")).expect("Invalid server URL");

        Self {
            base_url,
            state,
            handle,
        }
    }

    /// Add (or replace) a product with the given stock.
    pub fn put_product(&self, id: i32, title: &str, price: f64, stock: u32) {
        let record = json!({
            "id": id,
            "title": title,
            "price": price,
            "image": format!("https://rocketseat-cdn.s3.amazonaws.com/{id}.jpg"),
        });
        lock(&self.state.products).insert(id, record);
        lock(&self.state.stock).insert(id, stock);
    }

    /// Serve a raw product body, valid or not.
    pub fn put_raw_product(&self, id: i32, body: Value) {
        lock(&self.state.products).insert(id, body);
    }

    /// Change the stock of a product.
    pub fn set_stock(&self, id: i32, amount: u32) {
        lock(&self.state.stock).insert(id, amount);
    }

    /// Make the stock endpoint misbehave, or recover with [`StockFault::None`].
    pub fn set_stock_fault(&self, fault: StockFault) {
        *lock(&self.state.stock_fault) = fault;
    }

    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Catalog configuration pointing at this server.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            api_url: self.base_url.clone(),
            cache_ttl: Some(Duration::from_secs(300)),
            timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl Drop for CatalogServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A localhost URL nothing is listening on.
///
/// # Panics
///
/// Panics if a probe listener cannot be bound.
pub async fn unreachable_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("Invalid probe URL")
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn product(State(state): State<Arc<ServerState>>, Path(id): Path<i32>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    match lock(&state.products).get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn stock(State(state): State<Arc<ServerState>>, Path(id): Path<i32>) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    let fault = *lock(&state.stock_fault);
    if fault == StockFault::ServerError {
        return (StatusCode::INTERNAL_SERVER_ERROR, "stock service down").into_response();
    }
    let Some(amount) = lock(&state.stock).get(&id).copied() else {
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    };
    let body = Json(json!({ "id": id, "amount": amount }));
    match fault {
        StockFault::Created => (StatusCode::CREATED, body).into_response(),
        StockFault::EmptyBody => StatusCode::OK.into_response(),
        StockFault::None | StockFault::ServerError => body.into_response(),
    }
}
