use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use storefront_api::app::{build_app, services::AppServices};
use storefront_catalog::{Component, HeroLayout, Product, ProductCard, ProductDraft};
use storefront_core::ProductId;
use storefront_infra::{
    LayoutError, LayoutGenerator, ProductStore, StoreError,
    layout::LayoutResult,
    store::{InMemoryProductStore, StoreResult},
};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Layout generator that counts calls, keeps every hero it receives and
/// echoes its input.
#[derive(Default)]
struct CountingLayout {
    hero_calls: AtomicUsize,
    card_calls: AtomicUsize,
    heroes: Mutex<Vec<HeroLayout>>,
}

impl CountingLayout {
    fn heroes(&self) -> Vec<HeroLayout> {
        self.heroes.lock().unwrap().clone()
    }
}

#[async_trait]
impl LayoutGenerator for CountingLayout {
    async fn render_hero(&self, hero: &HeroLayout) -> LayoutResult<Component> {
        self.hero_calls.fetch_add(1, Ordering::SeqCst);
        self.heroes.lock().unwrap().push(hero.clone());
        Ok(Component::new(json!({ "type": "Hero", "heading": hero.heading })))
    }

    async fn render_card(&self, card: &ProductCard) -> LayoutResult<Component> {
        self.card_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Component::new(json!({ "type": "Card", "name": card.name })))
    }
}

struct FailingLayout;

#[async_trait]
impl LayoutGenerator for FailingLayout {
    async fn render_hero(&self, _hero: &HeroLayout) -> LayoutResult<Component> {
        Err(LayoutError::Transport("connection refused".to_string()))
    }

    async fn render_card(&self, _card: &ProductCard) -> LayoutResult<Component> {
        Err(LayoutError::Status { status: 503, body: "busy".to_string() })
    }
}

struct FailingStore;

fn down() -> StoreError {
    StoreError::Backend("connection reset".to_string())
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn create(&self, _draft: ProductDraft) -> StoreResult<Product> {
        Err(down())
    }

    async fn update(&self, _id: ProductId, _draft: ProductDraft) -> StoreResult<Option<Product>> {
        Err(down())
    }

    async fn delete(&self, _id: ProductId) -> StoreResult<Option<Product>> {
        Err(down())
    }

    async fn find_by_id(&self, _id: ProductId) -> StoreResult<Option<Product>> {
        Err(down())
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        Err(down())
    }
}

async fn spawn_with_counting_layout() -> (TestServer, Arc<CountingLayout>) {
    let layout = Arc::new(CountingLayout::default());
    let services = AppServices::new(Arc::new(InMemoryProductStore::new()), layout.clone());
    (TestServer::spawn(services).await, layout)
}

fn pen() -> Value {
    json!({ "name": "Pen", "description": "Blue ink", "price": 2, "category": "Stationery" })
}

async fn create_pen(client: &reqwest::Client, srv: &TestServer) -> Value {
    let res = client.post(srv.url("/products")).json(&pen()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["data"].clone()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn create_product_returns_assigned_id_and_fields() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/products")).json(&pen()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product saved successfully!");
    assert_eq!(body["data"]["name"], "Pen");
    assert_eq!(body["data"]["description"], "Blue ink");
    assert_eq!(body["data"]["price"], 2.0);
    assert_eq!(body["data"]["category"], "Stationery");
    assert!(!body["data"]["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_product_with_missing_field_is_a_server_error() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/products"))
        .json(&json!({ "name": "Pen", "price": 2 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Server error" }));
}

#[tokio::test]
async fn create_product_casts_a_numeric_string_price() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let mut body = pen();
    body["price"] = json!("2");
    let res = client.post(srv.url("/products")).json(&body).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["price"], 2.0);
}

#[tokio::test]
async fn badly_typed_fields_fail_store_validation() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();
    let created = create_pen(&client, &srv).await;
    let id = created["id"].as_str().unwrap();

    let mut body = pen();
    body["price"] = json!("abc");

    let responses = vec![
        client.post(srv.url("/products")).json(&body).send().await.unwrap(),
        client.put(srv.url(&format!("/products/{id}"))).json(&body).send().await.unwrap(),
    ];
    for res in responses {
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Server error" }));
    }

    let listing: Value = client.get(srv.url("/products")).send().await.unwrap().json().await.unwrap();
    assert_eq!(listing["data"], json!([created]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/products"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid request body." }));
}

#[tokio::test]
async fn list_on_empty_store_returns_empty_data() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;

    let res = reqwest::get(srv.url("/products")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn list_returns_created_products() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();
    let created = create_pen(&client, &srv).await;

    let body: Value = client.get(srv.url("/products")).send().await.unwrap().json().await.unwrap();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], created["id"]);
}

#[tokio::test]
async fn update_product_replaces_fields() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();
    let created = create_pen(&client, &srv).await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(srv.url(&format!("/products/{id}")))
        .json(&json!({ "name": "Pen", "description": "Red ink", "price": 2.5, "category": "Stationery" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product updated successfully!");
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["description"], "Red ink");
    assert_eq!(body["data"]["price"], 2.5);
}

#[tokio::test]
async fn patch_is_accepted_for_update() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();
    let created = create_pen(&client, &srv).await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .patch(srv.url(&format!("/products/{id}")))
        .json(&pen())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_unknown_product_is_not_found() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    for id in [ProductId::new().to_string(), "not-an-id".to_string()] {
        let res = client
            .put(srv.url(&format!("/products/{id}")))
            .json(&pen())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Product not found" }));
    }
}

#[tokio::test]
async fn delete_product_then_it_is_gone() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();
    let created = create_pen(&client, &srv).await;
    let id = created["id"].as_str().unwrap();

    let res = client.delete(srv.url(&format!("/products/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Product deleted successfully!" }));

    let res = client.delete(srv.url(&format!("/products/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_product_is_not_found() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let res = client
        .delete(srv.url(&format!("/products/{}", ProductId::new())))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn buy_product_confirms_without_changing_it() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();
    let created = create_pen(&client, &srv).await;
    let id = created["id"].as_str().unwrap();

    let res = client.post(srv.url(&format!("/products/{id}/buy"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product purchased successfully!");
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn buy_unknown_product_is_not_found() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url(&format!("/products/{}/buy", ProductId::new())))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn hero_without_subhead_is_rejected_without_calling_generator() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/shop/hero"))
        .json(&json!({ "heading": "Summer sale" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Heading and subhead are required fields." }));
    assert_eq!(layout.hero_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hero_with_empty_body_is_rejected() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/shop/hero")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(layout.hero_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_json_content_type_is_read_as_an_empty_body() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/shop/hero"))
        .header("content-type", "text/plain")
        .body(r#"{"heading":"H","subHead":"S"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Heading and subhead are required fields." }));
    assert_eq!(layout.hero_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hero_calls_generator_exactly_once() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/shop/hero"))
        .json(&json!({
            "heading": "Summer sale",
            "subHead": "Everything must go",
            "cta": { "label": "Shop now", "href": "/products" }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Hero section generated successfully");
    assert_eq!(body["component"], json!({ "type": "Hero", "heading": "Summer sale" }));
    assert_eq!(layout.hero_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hero_forwards_image_cta_and_style_unchanged() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    let image = json!({ "src": "/a.png", "alt": "a" });
    let cta = json!({ "label": "Shop now", "href": "/products" });
    let style = json!({ "theme": "dark", "padding": [8, 16] });

    let res = client
        .post(srv.url("/shop/hero"))
        .json(&json!({
            "heading": "H",
            "subHead": "S",
            "image": image,
            "cta": cta,
            "style": style
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let heroes = layout.heroes();
    assert_eq!(heroes.len(), 1);
    assert_eq!(heroes[0].heading, json!("H"));
    assert_eq!(heroes[0].subhead, json!("S"));
    assert_eq!(heroes[0].image, Some(image));
    assert_eq!(heroes[0].cta, Some(cta));
    assert_eq!(heroes[0].style, Some(style));
}

#[tokio::test]
async fn card_with_any_missing_field_is_rejected_without_calling_generator() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    for missing in ["name", "description", "price", "category"] {
        let mut body = pen();
        body.as_object_mut().unwrap().remove(missing);

        let res = client.post(srv.url("/shop/card")).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "missing {missing}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "All fields are required." }));
    }

    assert_eq!(layout.card_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn card_renders_component_once() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/shop/card")).json(&pen()).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product card generated successfully");
    assert_eq!(body["component"]["name"], "Pen");
    assert_eq!(layout.card_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn card_accepts_a_string_price() {
    let (srv, layout) = spawn_with_counting_layout().await;
    let client = reqwest::Client::new();

    let mut body = pen();
    body["price"] = json!("2");
    let res = client.post(srv.url("/shop/card")).json(&body).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(layout.card_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn card_does_not_persist_anything() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/shop/card")).json(&pen()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["component"]["type"], "ProductCard");

    let listing: Value = client.get(srv.url("/products")).send().await.unwrap().json().await.unwrap();
    assert_eq!(listing, json!({ "data": [] }));
}

#[tokio::test]
async fn generator_failures_are_server_errors() {
    let services = AppServices::new(Arc::new(InMemoryProductStore::new()), Arc::new(FailingLayout));
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/shop/hero"))
        .json(&json!({ "heading": "H", "subHead": "S" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Server error" }));

    let res = client.post(srv.url("/shop/card")).json(&pen()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn store_failures_are_server_errors_on_every_operation() {
    let services = AppServices::new(Arc::new(FailingStore), Arc::new(CountingLayout::default()));
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();
    let id = ProductId::new();

    let responses = vec![
        client.post(srv.url("/products")).json(&pen()).send().await.unwrap(),
        client.get(srv.url("/products")).send().await.unwrap(),
        client.put(srv.url(&format!("/products/{id}"))).json(&pen()).send().await.unwrap(),
        client.delete(srv.url(&format!("/products/{id}"))).send().await.unwrap(),
        client.post(srv.url(&format!("/products/{id}/buy"))).send().await.unwrap(),
    ];

    for res in responses {
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Server error" }));
    }
}
