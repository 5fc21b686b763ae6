use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

/// Seed a category with two destinations and a logged-in customer
///
/// Returns the two destination IDs and the customer token
async fn setup_catalog(app: &mut axum::Router) -> (String, String, String) {
    let admin_token = helper::login_as_admin(app).await;

    let category = helper::create_category(app, &admin_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let destination_a =
        helper::create_destination(app, &admin_token, &category_id, "Pantai Kuta", 100_000).await;
    let destination_b =
        helper::create_destination(app, &admin_token, &category_id, "Kawah Ijen", 50_000).await;

    let access_token = helper::register_and_login(app, "budi").await;

    (
        destination_a["id"].as_str().unwrap().to_string(),
        destination_b["id"].as_str().unwrap().to_string(),
        access_token,
    )
}

#[tokio::test]
async fn test_checkout() {
    let mut app = helper::setup_test_app().await;

    let (destination_a, destination_b, access_token) = setup_catalog(&mut app).await;

    let item_a = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_a,
        2,
        &helper::date_from_today(7),
    )
    .await;
    let item_b = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_b,
        1,
        &helper::date_from_today(8),
    )
    .await;

    let item_a_id = item_a["id"].as_str().unwrap();
    let item_b_id = item_b["id"].as_str().unwrap();

    let booking_code =
        helper::checkout(&mut app, &access_token, &[item_a_id, item_b_id], "qris").await;

    // the consumed items are gone from the cart
    let items = helper::list_cart(&mut app, &access_token).await;
    assert!(items.is_empty());

    let booking = helper::single_booking(&mut app, &access_token, &booking_code).await;

    // grand total is the sum over both frozen subtotals
    assert_eq!(Some(250_000), booking["grand_total"].as_i64());

    let details = booking["details"].as_array().unwrap();
    assert_eq!(2, details.len());

    let mut subtotals = details
        .iter()
        .map(|detail| detail["subtotal"].as_i64().unwrap())
        .collect::<Vec<_>>();
    subtotals.sort_unstable();
    assert_eq!(vec![50_000, 200_000], subtotals);
}

#[tokio::test]
async fn test_checkout_with_empty_cart_ids() {
    let mut app = helper::setup_test_app().await;

    let (_, _, access_token) = setup_catalog(&mut app).await;

    let (status_code, booking_code, error) =
        helper::maybe_checkout(&mut app, &access_token, &[], "qris").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(booking_code.is_none());
    assert_eq!(Some("No cart items selected".to_string()), error);

    // no booking came out of it
    let bookings = helper::my_bookings(&mut app, &access_token).await;
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn test_checkout_with_unknown_cart_item() {
    let mut app = helper::setup_test_app().await;

    let (_, _, access_token) = setup_catalog(&mut app).await;

    let unknown = uuid::Uuid::new_v4().to_string();

    let (status_code, _, error) =
        helper::maybe_checkout(&mut app, &access_token, &[&unknown], "qris").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Cart item not found".to_string()), error);
}

#[tokio::test]
async fn test_checkout_with_foreign_cart_item() {
    let mut app = helper::setup_test_app().await;

    let (destination_a, _, access_token) = setup_catalog(&mut app).await;

    let cart_item = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_a,
        1,
        &helper::date_from_today(7),
    )
    .await;
    let cart_item_id = cart_item["id"].as_str().unwrap().to_string();

    let other_token = helper::register_and_login(&mut app, "sari").await;

    let (status_code, _, error) =
        helper::maybe_checkout(&mut app, &other_token, &[&cart_item_id], "qris").await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert_eq!(
        Some("Cart item does not belong to you".to_string()),
        error
    );

    // the item is still in the owner's cart
    let items = helper::list_cart(&mut app, &access_token).await;
    assert_eq!(1, items.len());
}

#[tokio::test]
async fn test_checkout_twice_with_the_same_items() {
    let mut app = helper::setup_test_app().await;

    let (destination_a, _, access_token) = setup_catalog(&mut app).await;

    let cart_item = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_a,
        1,
        &helper::date_from_today(7),
    )
    .await;
    let cart_item_id = cart_item["id"].as_str().unwrap().to_string();

    let booking_code = helper::checkout(&mut app, &access_token, &[&cart_item_id], "qris").await;

    // the duplicate submission guard: the items are already consumed
    let (status_code, second_code, error) =
        helper::maybe_checkout(&mut app, &access_token, &[&cart_item_id], "qris").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(second_code.is_none());
    assert_eq!(Some("Cart item not found".to_string()), error);

    // the first booking is unaffected
    let booking = helper::single_booking(&mut app, &access_token, &booking_code).await;
    assert_eq!(Some(100_000), booking["grand_total"].as_i64());
    assert_eq!(1, booking["details"].as_array().unwrap().len());
}

#[tokio::test]
async fn test_checkout_duplicate_ids_are_a_set() {
    let mut app = helper::setup_test_app().await;

    let (destination_a, _, access_token) = setup_catalog(&mut app).await;

    let cart_item = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_a,
        2,
        &helper::date_from_today(7),
    )
    .await;
    let cart_item_id = cart_item["id"].as_str().unwrap().to_string();

    let booking_code = helper::checkout(
        &mut app,
        &access_token,
        &[&cart_item_id, &cart_item_id],
        "qris",
    )
    .await;

    // consumed once, not twice
    let booking = helper::single_booking(&mut app, &access_token, &booking_code).await;
    assert_eq!(Some(200_000), booking["grand_total"].as_i64());
    assert_eq!(1, booking["details"].as_array().unwrap().len());
}

#[tokio::test]
async fn test_checkout_status_follows_payment_method() {
    let mut app = helper::setup_test_app().await;

    let (destination_a, destination_b, access_token) = setup_catalog(&mut app).await;

    let item_a = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_a,
        1,
        &helper::date_from_today(7),
    )
    .await;
    let item_b = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_b,
        1,
        &helper::date_from_today(7),
    )
    .await;

    // QRIS settles at checkout
    let qris_code = helper::checkout(
        &mut app,
        &access_token,
        &[item_a["id"].as_str().unwrap()],
        "qris",
    )
    .await;

    let qris_booking = helper::single_booking(&mut app, &access_token, &qris_code).await;
    assert_eq!(Some("success"), qris_booking["status"].as_str());
    assert!(!qris_booking["paid_at"].is_null());

    // cash on arrival waits for the back-office
    let cod_code = helper::checkout(
        &mut app,
        &access_token,
        &[item_b["id"].as_str().unwrap()],
        "cod",
    )
    .await;

    let cod_booking = helper::single_booking(&mut app, &access_token, &cod_code).await;
    assert_eq!(Some("pending"), cod_booking["status"].as_str());
    assert!(cod_booking["paid_at"].is_null());
}

#[tokio::test]
async fn test_booking_total_is_frozen_against_price_changes() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login_as_admin(&mut app).await;

    let (destination_a, _, access_token) = setup_catalog(&mut app).await;

    let cart_item = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_a,
        2,
        &helper::date_from_today(7),
    )
    .await;

    let booking_code = helper::checkout(
        &mut app,
        &access_token,
        &[cart_item["id"].as_str().unwrap()],
        "qris",
    )
    .await;

    // raise the live price after the sale
    let (status_code, _, _) = helper::maybe_update_destination(
        &mut app,
        &admin_token,
        &destination_a,
        json!({ "price": 999_000 }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    // the booking keeps the frozen quote
    let booking = helper::single_booking(&mut app, &access_token, &booking_code).await;
    assert_eq!(Some(200_000), booking["grand_total"].as_i64());
    assert_eq!(
        Some(200_000),
        booking["details"][0]["subtotal"].as_i64()
    );
}

#[tokio::test]
async fn test_checkout_qr_payload() {
    let mut app = helper::setup_test_app().await;

    let (destination_a, destination_b, access_token) = setup_catalog(&mut app).await;

    let item_a = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_a,
        1,
        &helper::date_from_today(7),
    )
    .await;
    let item_b = helper::add_to_cart(
        &mut app,
        &access_token,
        &destination_b,
        1,
        &helper::date_from_today(7),
    )
    .await;

    let code_a = helper::checkout(
        &mut app,
        &access_token,
        &[item_a["id"].as_str().unwrap()],
        "qris",
    )
    .await;
    let code_b = helper::checkout(
        &mut app,
        &access_token,
        &[item_b["id"].as_str().unwrap()],
        "qris",
    )
    .await;

    let booking_a = helper::single_booking(&mut app, &access_token, &code_a).await;
    let booking_b = helper::single_booking(&mut app, &access_token, &code_b).await;

    let qr_a = booking_a["qr_payload"].as_str().unwrap();
    let qr_b = booking_b["qr_payload"].as_str().unwrap();

    // the payload embeds the booking identity and differs per booking
    assert_eq!(format!("wisata://ticket/{code_a}"), qr_a);
    assert_eq!(format!("wisata://ticket/{code_b}"), qr_b);
    assert_ne!(qr_a, qr_b);
}
