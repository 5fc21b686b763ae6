use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_destination_create_and_storefront() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let destination =
        helper::create_destination(&mut app, &access_token, &category_id, "Pantai Kuta", 100_000)
            .await;
    assert_eq!(Some("pantai-kuta"), destination["slug"].as_str());
    assert_eq!(Some(100_000), destination["price"].as_i64());
    assert_eq!(Some(true), destination["is_active"].as_bool());

    // the storefront sees it
    let destinations = helper::list_destinations(&mut app).await;
    assert_eq!(1, destinations.len());

    let (status_code, single, _) = helper::single_destination(&mut app, "pantai-kuta").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some("Pantai Kuta"), single.unwrap()["name"].as_str());
}

#[tokio::test]
async fn test_destination_slug_is_unique() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    helper::create_destination(&mut app, &access_token, &category_id, "Pantai Kuta", 100_000)
        .await;

    let payload = json!({
        "category_id": category_id,
        "name": "Pantai Kuta",
        "description": "The same place again",
        "price": 90_000,
        "location": "Bali",
    });

    let (status_code, destination, error) =
        helper::maybe_create_destination(&mut app, &access_token, payload).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(destination.is_none());
    assert_eq!(Some("Slug already exists".to_string()), error);
}

#[tokio::test]
async fn test_destination_validation() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    // negative price
    let payload = json!({
        "category_id": category_id,
        "name": "Pantai Kuta",
        "description": "A lovely place",
        "price": -1,
        "location": "Bali",
    });

    let (status_code, _, error) =
        helper::maybe_create_destination(&mut app, &access_token, payload).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Price can not be negative".to_string()), error);

    // unknown category
    let payload = json!({
        "category_id": uuid::Uuid::new_v4(),
        "name": "Pantai Kuta",
        "description": "A lovely place",
        "price": 100_000,
        "location": "Bali",
    });

    let (status_code, _, error) =
        helper::maybe_create_destination(&mut app, &access_token, payload).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Category not found".to_string()), error);

    // broken image URL
    let payload = json!({
        "category_id": category_id,
        "name": "Pantai Kuta",
        "description": "A lovely place",
        "price": 100_000,
        "location": "Bali",
        "image_url": "not a url",
    });

    let (status_code, _, _) =
        helper::maybe_create_destination(&mut app, &access_token, payload).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
}

#[tokio::test]
async fn test_destination_update() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let destination =
        helper::create_destination(&mut app, &access_token, &category_id, "Pantai Kuta", 100_000)
            .await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let (status_code, updated, _) = helper::maybe_update_destination(
        &mut app,
        &access_token,
        &destination_id,
        json!({ "price": 150_000 }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let updated = updated.unwrap();
    assert_eq!(Some(150_000), updated["price"].as_i64());
    // untouched fields stay as they are
    assert_eq!(Some("Pantai Kuta"), updated["name"].as_str());
    assert_eq!(Some("pantai-kuta"), updated["slug"].as_str());
}

#[tokio::test]
async fn test_destination_hide() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let destination =
        helper::create_destination(&mut app, &access_token, &category_id, "Pantai Kuta", 100_000)
            .await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let status_code = helper::delete_destination(&mut app, &access_token, &destination_id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // gone from the storefront
    let destinations = helper::list_destinations(&mut app).await;
    assert!(destinations.is_empty());

    let (status_code, _, _) = helper::single_destination(&mut app, "pantai-kuta").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
}

#[tokio::test]
async fn test_destination_management_needs_admin() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &admin_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let access_token = helper::register_and_login(&mut app, "budi").await;

    let payload = json!({
        "category_id": category_id,
        "name": "Pantai Kuta",
        "description": "A lovely place",
        "price": 100_000,
        "location": "Bali",
    });

    let (status_code, _, _) =
        helper::maybe_create_destination(&mut app, &access_token, payload).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
}
