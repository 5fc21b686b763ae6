use axum::http::StatusCode;
use serde_json::Value;

use crate::tests::helper;

/// Seed a category and a destination, returning the destination
async fn setup_destination(
    app: &mut axum::Router,
    admin_token: &str,
    name: &str,
    price: i64,
) -> Value {
    let category = helper::create_category(app, admin_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    helper::create_destination(app, admin_token, &category_id, name, price).await
}

#[tokio::test]
async fn test_add_to_cart() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;
    let destination = setup_destination(&mut app, &admin_token, "Pantai Kuta", 100_000).await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let access_token = helper::register_and_login(&mut app, "budi").await;

    let cart_item = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_id,
        2,
        &helper::date_from_today(7),
    )
    .await;

    assert_eq!(Some(2), cart_item["quantity"].as_i64());
    assert_eq!(Some(200_000), cart_item["subtotal"].as_i64());
    assert_eq!(
        Some("Pantai Kuta"),
        cart_item["destination"]["name"].as_str()
    );

    let items = helper::list_cart(&mut app, &access_token).await;
    assert_eq!(1, items.len());
}

#[tokio::test]
async fn test_add_to_cart_validation() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;
    let destination = setup_destination(&mut app, &admin_token, "Pantai Kuta", 100_000).await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let access_token = helper::register_and_login(&mut app, "budi").await;

    // zero quantity
    let (status_code, _, error) = helper::maybe_add_to_cart(
        &mut app,
        &access_token,
        &destination_id,
        0,
        &helper::date_from_today(7),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Quantity must be at least 1".to_string()), error);

    // visit date in the past
    let (status_code, _, error) = helper::maybe_add_to_cart(
        &mut app,
        &access_token,
        &destination_id,
        1,
        "2020-01-01",
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Visit date can not be in the past".to_string()), error);

    // today is fine
    let (status_code, _, _) = helper::maybe_add_to_cart(
        &mut app,
        &access_token,
        &destination_id,
        1,
        &helper::today(),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    // unknown destination
    let (status_code, _, error) = helper::maybe_add_to_cart(
        &mut app,
        &access_token,
        &uuid::Uuid::new_v4().to_string(),
        1,
        &helper::date_from_today(7),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Destination is not available".to_string()), error);
}

#[tokio::test]
async fn test_add_hidden_destination_to_cart() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;
    let destination = setup_destination(&mut app, &admin_token, "Pantai Kuta", 100_000).await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let status_code = helper::delete_destination(&mut app, &admin_token, &destination_id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let access_token = helper::register_and_login(&mut app, "budi").await;

    let (status_code, _, error) = helper::maybe_add_to_cart(
        &mut app,
        &access_token,
        &destination_id,
        1,
        &helper::date_from_today(7),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Destination is not available".to_string()), error);
}

#[tokio::test]
async fn test_cart_subtotal_is_requoted_on_price_change() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;
    let destination = setup_destination(&mut app, &admin_token, "Pantai Kuta", 100_000).await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let access_token = helper::register_and_login(&mut app, "budi").await;

    helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_id,
        2,
        &helper::date_from_today(7),
    )
    .await;

    // the cart quote follows the live price
    let (status_code, _, _) = helper::maybe_update_destination(
        &mut app,
        &admin_token,
        &destination_id,
        serde_json::json!({ "price": 150_000 }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let items = helper::list_cart(&mut app, &access_token).await;
    assert_eq!(Some(300_000), items[0]["subtotal"].as_i64());
}

#[tokio::test]
async fn test_remove_cart_item() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;
    let destination = setup_destination(&mut app, &admin_token, "Pantai Kuta", 100_000).await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let access_token = helper::register_and_login(&mut app, "budi").await;

    let cart_item = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_id,
        1,
        &helper::date_from_today(7),
    )
    .await;
    let cart_item_id = cart_item["id"].as_str().unwrap().to_string();

    let (status_code, _) =
        helper::maybe_remove_cart_item(&mut app, &access_token, &cart_item_id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let items = helper::list_cart(&mut app, &access_token).await;
    assert!(items.is_empty());

    // removing it twice reads as not found
    let (status_code, error) =
        helper::maybe_remove_cart_item(&mut app, &access_token, &cart_item_id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Cart item not found".to_string()), error);
}

#[tokio::test]
async fn test_cart_is_per_user() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;
    let destination = setup_destination(&mut app, &admin_token, "Pantai Kuta", 100_000).await;
    let destination_id = destination["id"].as_str().unwrap().to_string();

    let budi_token = helper::register_and_login(&mut app, "budi").await;
    let sari_token = helper::register_and_login(&mut app, "sari").await;

    let cart_item = helper::add_to_cart(
        &mut app,
        &budi_token,
        &destination_id,
        1,
        &helper::date_from_today(7),
    )
    .await;
    let cart_item_id = cart_item["id"].as_str().unwrap().to_string();

    // the other user does not see it
    let items = helper::list_cart(&mut app, &sari_token).await;
    assert!(items.is_empty());

    // and can not remove it either, without learning it exists
    let (status_code, error) =
        helper::maybe_remove_cart_item(&mut app, &sari_token, &cart_item_id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Cart item not found".to_string()), error);

    // untouched for the owner
    let items = helper::list_cart(&mut app, &budi_token).await;
    assert_eq!(1, items.len());
}
