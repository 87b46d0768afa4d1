use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use meetup_travel::api;
use meetup_travel::auth::{self, ROLE_ADMIN};
use meetup_travel::db;
use meetup_travel::infrastructure::AppState;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

struct TestApp {
    router: Router,
    token: String,
}

impl TestApp {
    async fn new() -> Self {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");
        Self {
            router: api::api_router(AppState::new(db)),
            token: auth::create_jwt("admin@meetup.travel", 1, ROLE_ADMIN)
                .expect("Failed to create token"),
        }
    }

    async fn send(&self, method: &str, uri: &str, payload: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .uri(uri)
            .method(method)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let request = match payload {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    async fn create_tour(&self, payload: Value) -> Value {
        let (status, tour) = self.send("POST", "/tours", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", tour);
        tour
    }
}

fn ha_long() -> Value {
    json!({
        "title": "Ha Long Bay Cruise",
        "description": "Limestone karsts and floating villages",
        "price": "59.00",
        "duration": 1,
        "rating": 4.7,
        "featured": true,
        "highlights": ["Sung Sot cave", "Kayaking"],
        "includedServices": ["Lunch"],
        "excludedServices": ["Drinks"],
        "pickupPoints": ["Hanoi Old Quarter"],
        "categories": ["Day Trip", "Adventure", "Day Trip"],
        "additionalServices": [
            { "name": "Airport Transfer", "price": "25.00", "priceUnit": "per car" }
        ],
        "pricingOptions": [
            { "customerType": "Adult", "price": "59.00", "roundTrip": false },
            { "customerType": "Adult", "price": "69.00", "roundTrip": true }
        ]
    })
}

#[tokio::test]
async fn test_tour_create_and_sub_resources() {
    let app = TestApp::new().await;
    let tour = app.create_tour(ha_long()).await;
    let id = tour["id"].as_i64().unwrap();

    assert_eq!(tour["categories"].as_array().unwrap().len(), 2);
    assert_eq!(tour["pricingOptions"].as_array().unwrap().len(), 2);
    assert_eq!(tour["additionalServices"][0]["name"], "Airport Transfer");

    let (status, highlights) = app.send("GET", &format!("/tours/{}/highlights", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(highlights, json!(["Sung Sot cave", "Kayaking"]));

    let (_, included) = app
        .send("GET", &format!("/tours/{}/included-services", id), None)
        .await;
    assert_eq!(included, json!(["Lunch"]));

    let (_, excluded) = app
        .send("GET", &format!("/tours/{}/excluded-services", id), None)
        .await;
    assert_eq!(excluded, json!(["Drinks"]));

    let (_, pickup) = app
        .send("GET", &format!("/tours/{}/pickup-points", id), None)
        .await;
    assert_eq!(pickup, json!(["Hanoi Old Quarter"]));

    let (_, round_trip) = app
        .send("GET", &format!("/tour-pricing/tour/{}/round-trip/true", id), None)
        .await;
    assert_eq!(round_trip.as_array().unwrap().len(), 1);
    assert_eq!(round_trip[0]["price"], "69.00");

    let (status, _) = app.send("GET", "/tours/999/highlights", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tour_update_keeps_omitted_collections() {
    let app = TestApp::new().await;
    let tour = app.create_tour(ha_long()).await;
    let id = tour["id"].as_i64().unwrap();

    let (status, updated) = app
        .send(
            "PUT",
            &format!("/tours/{}", id),
            Some(json!({
                "title": "Ha Long Bay Overnight",
                "price": "99.00",
                "highlights": ["Sunset party"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Ha Long Bay Overnight");
    assert_eq!(updated["highlights"], json!(["Sunset party"]));
    assert_eq!(updated["pickupPoints"], json!(["Hanoi Old Quarter"]));
    assert_eq!(updated["pricingOptions"].as_array().unwrap().len(), 2);
    assert_eq!(updated["categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_listing_search_and_filters() {
    let app = TestApp::new().await;
    app.create_tour(ha_long()).await;
    app.create_tour(json!({
        "title": "Ninh Binh Countryside",
        "price": "45.00",
        "rating": 4.9,
        "categories": ["Culture"]
    }))
    .await;

    let (status, page) = app.send("GET", "/tours?page=0&size=1&sortBy=price", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalElements"], 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["content"][0]["title"], "Ninh Binh Countryside");

    let (status, _) = app.send("GET", "/tours?sortBy=colour", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, featured) = app.send("GET", "/tours/featured", None).await;
    assert_eq!(featured["totalElements"], 1);
    assert_eq!(featured["content"][0]["title"], "Ha Long Bay Cruise");

    let (_, culture) = app.send("GET", "/tours/category/Culture", None).await;
    assert_eq!(culture["totalElements"], 1);

    let (_, unknown) = app.send("GET", "/tours/category/Nightlife", None).await;
    assert_eq!(unknown["totalElements"], 0);

    let (_, found) = app.send("GET", "/tours/search?query=karsts", None).await;
    assert_eq!(found["totalElements"], 1);

    let (_, top) = app.send("GET", "/tours/top-rated", None).await;
    assert_eq!(top[0]["title"], "Ninh Binh Countryside");

    let (_, all) = app.send("GET", "/categories/all", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_duplicate_pricing_tier_conflicts() {
    let app = TestApp::new().await;
    let tour = app.create_tour(ha_long()).await;
    let id = tour["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            "POST",
            &format!("/tour-pricing/tour/{}", id),
            Some(json!({ "customerType": "Adult", "price": "55.00", "roundTrip": false })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, child) = app
        .send(
            "POST",
            &format!("/tour-pricing/tour/{}", id),
            Some(json!({ "customerType": "Child", "price": "39.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let child_id = child["id"].as_i64().unwrap();

    let (status, _) = app
        .send("DELETE", &format!("/tour-pricing/{}", child_id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, tiers) = app
        .send("GET", &format!("/tour-pricing/tour/{}", id), None)
        .await;
    assert_eq!(tiers.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_service_link_and_unlink() {
    let app = TestApp::new().await;
    let first = app.create_tour(ha_long()).await;
    let second = app
        .create_tour(json!({ "title": "Ninh Binh Countryside", "price": "45.00" }))
        .await;
    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();
    let transfer_id = first["additionalServices"][0]["id"].as_i64().unwrap();

    // Linking twice leaves one link
    for _ in 0..2 {
        let (status, linked) = app
            .send(
                "POST",
                &format!("/tours/{}/additional-services/{}", second_id, transfer_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(linked.as_array().unwrap().len(), 1);
    }

    // Still linked to the second tour, so the service survives
    let (status, _) = app
        .send(
            "DELETE",
            &format!(
                "/tours/{}/additional-services/{}?deleteService=true",
                first_id, transfer_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .send("GET", &format!("/additional-services/{}", transfer_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Not linked any more
    let (status, _) = app
        .send(
            "PUT",
            &format!("/tours/{}/additional-services/{}", first_id, transfer_id),
            Some(json!({ "name": "Airport Transfer", "price": "30.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            "DELETE",
            &format!(
                "/tours/{}/additional-services/{}?deleteService=true",
                second_id, transfer_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .send("GET", &format!("/additional-services/{}", transfer_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = app
        .send(
            "POST",
            &format!("/tours/{}/additional-services", first_id),
            Some(json!({ "name": "Travel Insurance", "price": "5.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, services) = app
        .send("GET", &format!("/tours/{}/additional-services", first_id), None)
        .await;
    assert_eq!(services[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_reviews_by_tour_and_platform() {
    let app = TestApp::new().await;
    let tour = app.create_tour(ha_long()).await;
    let id = tour["id"].as_i64().unwrap();

    for (platform, rating) in [("TripAdvisor", 5.0), ("Google", 4.0), ("TripAdvisor", 4.5)] {
        let (status, _) = app
            .send(
                "POST",
                &format!("/tour-reviews/tour/{}", id),
                Some(json!({ "platform": platform, "rating": rating, "reviewerName": "Anna" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app
        .send(
            "POST",
            &format!("/tour-reviews/tour/{}", id),
            Some(json!({ "platform": "Google", "rating": 7.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, count) = app
        .send("GET", &format!("/tour-reviews/count/tour/{}", id), None)
        .await;
    assert_eq!(count, json!(3));

    let (_, trip) = app
        .send(
            "GET",
            &format!("/tour-reviews/tour/{}/platform/TripAdvisor", id),
            None,
        )
        .await;
    assert_eq!(trip.as_array().unwrap().len(), 2);
}
