use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_category_create_and_list() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    assert_eq!(Some("Pantai"), category["name"].as_str());
    assert_eq!(Some("pantai"), category["slug"].as_str());

    helper::create_category(&mut app, &access_token, "Gunung Berapi").await;

    // listing is public
    let categories = helper::list_categories(&mut app).await;
    assert_eq!(2, categories.len());
}

#[tokio::test]
async fn test_category_slug_is_unique() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    helper::create_category(&mut app, &access_token, "Pantai").await;

    // different name, same derived slug
    let (status_code, category, error) =
        helper::maybe_create_category(&mut app, &access_token, "PANTAI!").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(category.is_none());
    assert_eq!(Some("Slug already exists".to_string()), error);
}

#[tokio::test]
async fn test_category_with_unusable_name() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let (status_code, _, error) =
        helper::maybe_create_category(&mut app, &access_token, "???").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Name can not be empty".to_string()), error);
}

#[tokio::test]
async fn test_category_delete_is_restricted_while_referenced() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    helper::create_destination(&mut app, &access_token, &category_id, "Pantai Kuta", 100_000)
        .await;

    // still referenced, deletion is rejected
    let (status_code, error) =
        helper::maybe_delete_category(&mut app, &access_token, &category_id).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        Some("Category is still referenced by destinations".to_string()),
        error
    );

    let empty_category = helper::create_category(&mut app, &access_token, "Gunung").await;
    let empty_category_id = empty_category["id"].as_str().unwrap().to_string();

    let (status_code, _) =
        helper::maybe_delete_category(&mut app, &access_token, &empty_category_id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);
}

#[tokio::test]
async fn test_category_management_needs_admin() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "budi").await;

    let (status_code, _, _) =
        helper::maybe_create_category(&mut app, &access_token, "Pantai").await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
}

#[tokio::test]
async fn test_category_rename() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login_as_admin(&mut app).await;

    let category = helper::create_category(&mut app, &access_token, "Pantai").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let (status_code, category, _) =
        helper::maybe_update_category(&mut app, &access_token, &category_id, "Pantai Tropis")
            .await;
    assert_eq!(StatusCode::OK, status_code);

    let category = category.unwrap();
    assert_eq!(Some("Pantai Tropis"), category["name"].as_str());
    assert_eq!(Some("pantai-tropis"), category["slug"].as_str());
}
