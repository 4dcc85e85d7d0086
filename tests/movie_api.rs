//! Full router over the in-memory catalogue

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use movie_descriptions_server::api::create_router;
use movie_descriptions_server::{create_in_memory_app_state, AppConfig};

fn app() -> Router {
    create_router(create_in_memory_app_state(), &AppConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

fn movie(code: &str, name: &str, rating: f64, status: &str, categories: &[i64]) -> Value {
    json!({
        "eidrCode": code,
        "name": name,
        "rating": rating,
        "year": 2001,
        "status": status,
        "categories": categories,
    })
}

async fn create(app: &Router, body: Value) {
    let (status, response) = send(app, Method::POST, "/api/movie/create-movie", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", response);
}

async fn table(app: &Router, filter: Value) -> Value {
    let (status, body) =
        send(app, Method::POST, "/api/movie/get-movies-table", Some(filter)).await;
    assert_eq!(status, StatusCode::OK, "table failed: {}", body);
    body
}

fn codes(page: &Value) -> Vec<String> {
    page["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["eidrCode"].as_str().unwrap().to_string())
        .collect()
}

async fn seed(app: &Router) {
    create(app, movie("10.5240/0001", "Alien", 8.5, "ACTIVE", &[12, 11])).await;
    create(app, movie("10.5240/0002", "Brazil", 7.9, "INACTIVE", &[4])).await;
    create(app, movie("10.5240/0003", "Casablanca", 8.5, "ACTIVE", &[7, 10])).await;
    create(app, movie("10.5240/0004", "Dune", 6.4, "ACTIVE", &[11])).await;
    create(app, movie("10.5240/0005", "Eraserhead", 7.3, "INACTIVE", &[9])).await;
    create(app, movie("10.5240/0006", "Fargo", 8.1, "ACTIVE", &[5, 4])).await;
}

#[tokio::test]
async fn categories_are_seeded() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/movie/get-categories", None).await;

    assert_eq!(status, StatusCode::OK);
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 12);
    assert_eq!(categories[0], json!({"id": 1, "name": "Action"}));
    assert_eq!(categories[11], json!({"id": 12, "name": "Thriller"}));
}

#[tokio::test]
async fn movie_lifecycle() {
    let app = app();

    create(&app, movie("10.5240/AAAA", "Heat", 8.3, "ACTIVE", &[5, 1, 5])).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/movie/get-movie?eidrCode=10.5240%2FAAAA",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movie"]["name"], "Heat");
    assert_eq!(
        body["categories"],
        json!([{"id": 1, "name": "Action"}, {"id": 5, "name": "Crime"}])
    );

    let mut update = movie("10.5240/AAAA", "Heat (1995)", 8.4, "INACTIVE", &[7]);
    update["year"] = json!(1995);
    let (status, body) = send(&app, Method::PUT, "/api/movie/update-movie", Some(update)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["movie"]["name"], "Heat (1995)");
    assert_eq!(body["movie"]["year"], 1995);
    assert_eq!(body["movie"]["status"], "INACTIVE");
    assert_eq!(body["categories"], json!([{"id": 7, "name": "Drama"}]));

    let (status, body) = send(&app, Method::GET, "/api/movie/get-by-name/heat%20(1995)", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["categories"][0]["name"], "Drama");

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/movie/delete-movies",
        Some(json!({"eidrCodes": ["10.5240/AAAA"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/movie/get-movie?eidrCode=10.5240%2FAAAA",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Movie with eidrCode 10.5240/AAAA does not exist."
    );
}

#[tokio::test]
async fn duplicate_movie_is_rejected() {
    let app = app();
    create(&app, movie("X-1", "Heat", 8.3, "ACTIVE", &[1])).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/movie/create-movie",
        Some(movie("X-1", "Other", 5.0, "ACTIVE", &[2])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Movie with eidrCode X-1 already exists.");
}

#[tokio::test]
async fn business_rules_are_bad_requests() {
    let app = app();

    let mut future = movie("F-1", "Future", 5.0, "ACTIVE", &[1]);
    future["year"] = json!(9999);
    let (status, body) =
        send(&app, Method::POST, "/api/movie/create-movie", Some(future)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Year cannot be in the future.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/movie/create-movie",
        Some(movie("F-2", "Nowhere", 5.0, "ACTIVE", &[1, 404])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Some categories do not exist.");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/movie/create-movie",
        Some(movie("F-3", "Empty", 5.0, "ACTIVE", &[])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/movie/update-movie",
        Some(movie("missing", "Ghost", 5.0, "ACTIVE", &[1])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_all_or_nothing() {
    let app = app();
    create(&app, movie("D-1", "One", 5.0, "ACTIVE", &[1])).await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/movie/delete-movies",
        Some(json!({"eidrCodes": ["D-1", "D-2"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Some movies do not exist.");

    let (status, _) = send(&app, Method::GET, "/api/movie/get-by-eidr/D-1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn movie_table_defaults_order_by_rating_ascending() {
    let app = app();
    seed(&app).await;

    let page = table(&app, json!({})).await;

    assert_eq!(page["page"], 1);
    assert_eq!(page["pageSize"], 5);
    assert_eq!(page["totalItems"], 6);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(
        codes(&page),
        vec![
            "10.5240/0004",
            "10.5240/0005",
            "10.5240/0002",
            "10.5240/0006",
            "10.5240/0001",
        ]
    );
    assert_eq!(page["movies"][4]["categories"], "Science Fiction, Thriller");

    let second = table(&app, json!({"page": 2})).await;
    assert_eq!(codes(&second), vec!["10.5240/0003"]);

    let beyond = table(&app, json!({"page": 9})).await;
    assert!(codes(&beyond).is_empty());
    assert_eq!(beyond["totalItems"], 6);
}

#[tokio::test]
async fn movie_table_filters_and_sorting() {
    let app = app();
    seed(&app).await;

    let by_name = table(
        &app,
        json!({"orderBy": "NAME", "direction": "DESC", "pageSize": 3}),
    )
    .await;
    assert_eq!(
        codes(&by_name),
        vec!["10.5240/0006", "10.5240/0005", "10.5240/0004"]
    );

    let crime_or_comedy = table(&app, json!({"categoryIds": [4, 5]})).await;
    assert_eq!(
        codes(&crime_or_comedy),
        vec!["10.5240/0002", "10.5240/0006"]
    );

    let active = table(&app, json!({"showOnlyActivated": true, "pageSize": 10})).await;
    assert_eq!(active["totalItems"], 4);

    let by_text = table(&app, json!({"name": "E", "eidrCode": "5240/000"})).await;
    assert_eq!(
        codes(&by_text),
        vec!["10.5240/0004", "10.5240/0005", "10.5240/0001"]
    );

    let none = table(&app, json!({"name": "zzz"})).await;
    assert_eq!(none["totalItems"], 0);
    assert_eq!(none["totalPages"], 0);
}

#[tokio::test]
async fn invalid_filter_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/movie/get-movies-table",
        Some(json!({"pageSize": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["param"], "pageSize");
    assert_eq!(body["error"]["message"], "Invalid request: pageSize: range");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/v3/api-docs", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["description"], "API for Movie Descriptions Application");
    assert!(body["paths"]["/api/movie/get-movies-table"]["post"].is_object());
    assert!(body["paths"]["/api/movie/delete-movies"]["delete"].is_object());
}
