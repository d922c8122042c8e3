//! End-to-end tests: the full router served on an ephemeral port, driven over HTTP

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::build_router;
use crate::common::migrations::test_support::setup_test_db;
use crate::common::state::test_support::{test_state, token_for};
use crate::common::config::CorsOrigins;
use crate::common::AppState;
use crate::users::grants::{GrantsService, OPERATOR_ISSUER};

const PROVIDER: &str = "provider@example.com";
const RENTER: &str = "renter@example.com";

struct TestServer {
    base: String,
    http: Client,
    state: AppState,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    async fn start_with(configure: impl FnOnce(&mut AppState)) -> Self {
        let cors = CorsOrigins::List(vec!["http://localhost:5173".to_string()]);
        Self::start_on(configure, &cors).await
    }

    async fn start_on(configure: impl FnOnce(&mut AppState), cors: &CorsOrigins) -> Self {
        let mut state = test_state(setup_test_db().await);
        configure(&mut state);

        let router = build_router(Arc::new(RwLock::new(state.clone())), cors);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service()).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            http: Client::builder().no_proxy().build().unwrap(),
            state,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str, as_email: Option<&str>) -> (StatusCode, Value) {
        let mut request = self.http.get(self.url(path));
        if let Some(email) = as_email {
            request = request.bearer_auth(token_for(email));
        }
        read(request.send().await.unwrap()).await
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        as_email: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self
            .http
            .request(method, self.url(path))
            .bearer_auth(token_for(as_email));
        if let Some(body) = body {
            request = request.json(&body);
        }
        read(request.send().await.unwrap()).await
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.unwrap();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}

fn suv() -> Value {
    json!({
        "name": "Mitsubishi Pajero",
        "price": 50,
        "category": "SUV",
        "location": "Dhaka",
        "imageUrl": "https://img.example.com/pajero.jpg",
        "description": "Seven seats",
        "status": "booked",
        "providerEmail": "someone-else@example.com"
    })
}

#[tokio::test]
async fn test_book_and_cancel_scenario() {
    let server = TestServer::start().await;

    let (status, health) = server.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["databaseStatus"], "healthy");

    // Provider lists a car; client-sent status and owner are ignored
    let (status, created) = server
        .send(reqwest::Method::POST, "/api/cars", PROVIDER, Some(suv()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let car_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["car"]["status"], "available");
    assert_eq!(created["car"]["providerEmail"], PROVIDER);
    assert_eq!(created["car"]["category"], "SUV");

    // Renter books it
    let (status, booked) = server
        .send(
            reqwest::Method::POST,
            &format!("/api/cars/{}/book", car_id),
            RENTER,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = booked["booking"]["id"].as_str().unwrap().to_string();

    let (_, car) = server.get(&format!("/api/cars/{}", car_id), None).await;
    assert_eq!(car["status"], "booked");

    let (status, mine) = server.get("/api/my-bookings", Some(RENTER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["carId"], car_id.as_str());
    assert_eq!(mine[0]["userEmail"], RENTER);
    assert_eq!(mine[0]["carName"], "Mitsubishi Pajero");

    // A second renter is refused
    let (status, error) = server
        .send(
            reqwest::Method::POST,
            &format!("/api/cars/{}/book", car_id),
            "late@example.com",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");

    // Renter cancels
    let (status, _) = server
        .send(
            reqwest::Method::DELETE,
            &format!("/api/bookings/{}", booking_id),
            RENTER,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, car) = server.get(&format!("/api/cars/{}", car_id), None).await;
    assert_eq!(car["status"], "available");

    let (_, mine) = server.get("/api/my-bookings", Some(RENTER)).await;
    assert!(mine.as_array().unwrap().is_empty());

    let (status, error) = server
        .send(
            reqwest::Method::DELETE,
            &format!("/api/bookings/{}", booking_id),
            RENTER,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_authentication_and_ownership() {
    let server = TestServer::start().await;

    let (status, error) = server.get("/api/my-bookings", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], "UNAUTHENTICATED");

    let response = server
        .http
        .get(server.url("/api/car/my-listings"))
        .header("Authorization", "Token abc")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (_, created) = server
        .send(reqwest::Method::POST, "/api/cars", PROVIDER, Some(suv()))
        .await;
    let car_path = format!("/api/cars/{}", created["id"].as_str().unwrap());

    let (status, _) = server
        .send(
            reqwest::Method::PUT,
            &car_path,
            "stranger@example.com",
            Some(json!({ "price": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = server
        .send(
            reqwest::Method::PUT,
            &car_path,
            PROVIDER,
            Some(json!({ "price": "65", "status": "booked" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["car"]["price"], 65.0);
    assert_eq!(updated["car"]["status"], "available");

    let (status, error) = server
        .send(
            reqwest::Method::POST,
            "/api/cars",
            PROVIDER,
            Some(json!({ "name": "No price" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");

    let (status, listings) = server.get("/api/car/my-listings", Some(PROVIDER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listings.as_array().unwrap().len(), 1);

    let (_, found) = server.get("/api/cars/search?q=pajero", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_grant_redemption() {
    let server = TestServer::start_with(|state| {
        state.admin_emails.insert("root@example.com".to_string());
    })
    .await;

    server
        .send(
            reqwest::Method::PUT,
            "/api/users",
            RENTER,
            Some(json!({ "name": "Renter" })),
        )
        .await;

    let (status, _) = server.get("/api/users", Some(RENTER)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A guessed secret changes nothing
    let (status, _) = server
        .send(
            reqwest::Method::PATCH,
            "/api/users/make-admin",
            RENTER,
            Some(json!({ "secretKey": "letmein" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, role) = server
        .get(&format!("/api/users/role/{}", RENTER), Some(RENTER))
        .await;
    assert_eq!(role["role"], "user");

    // Bootstrap admin issues a grant over HTTP
    let (status, issued) = server
        .send(
            reqwest::Method::POST,
            "/api/admin/grants",
            "root@example.com",
            Some(json!({ "note": "new ops hire", "expiresInHours": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let secret = issued["secret"].as_str().unwrap().to_string();
    assert!(issued["grant"].get("secretHash").is_none());

    let (status, promoted) = server
        .send(
            reqwest::Method::PATCH,
            "/api/users/make-admin",
            RENTER,
            Some(json!({ "secretKey": secret })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["user"]["role"], "admin");

    let (status, users) = server.get("/api/users", Some(RENTER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);

    let (_, stats) = server.get("/api/dashboard/stats", Some(RENTER)).await;
    assert_eq!(stats["scope"], "global");

    // Spent
    let (status, _) = server
        .send(
            reqwest::Method::PATCH,
            "/api/users/make-admin",
            "other@example.com",
            Some(json!({ "secretKey": secret })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_restricted_account_cannot_elevate() {
    let server = TestServer::start_with(|state| {
        state.restricted_emails.insert("ta@gmail.com".to_string());
    })
    .await;

    let issued = GrantsService::new(server.state.db.clone())
        .issue(OPERATOR_ISSUER, None, None)
        .await
        .unwrap();

    let (status, error) = server
        .send(
            reqwest::Method::PATCH,
            "/api/users/make-admin",
            "ta@gmail.com",
            Some(json!({ "secretKey": issued.secret })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(error["message"].as_str().unwrap().contains("demo account"));

    let (_, me) = server.get("/api/me", Some("ta@gmail.com")).await;
    assert_eq!(me["restricted"], true);
    assert_eq!(me["role"], "user");
}

#[tokio::test]
async fn test_wildcard_cors_echoes_caller_origin() {
    let server = TestServer::start_on(|_| {}, &CorsOrigins::parse("*")).await;

    let response = server
        .http
        .get(server.url("/api/health"))
        .header("Origin", "https://fleet.example.org")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://fleet.example.org"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn test_listed_cors_origin_only() {
    let server = TestServer::start().await;

    let allowed = server
        .http
        .get(server.url("/api/health"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let other = server
        .http
        .get(server.url("/api/health"))
        .header("Origin", "https://evil.example.net")
        .send()
        .await
        .unwrap();
    assert!(other.headers().get("access-control-allow-origin").is_none());
}
