use super::*;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_track_new_product() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "50", "00"));
    let app = ctx.router();

    let (status, message) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message,
        "Success! Tracking has been set up for \"Philips Series 5000 Electric K...\""
    );
    assert_eq!(ctx.count_rows("products").await?, 1);
    assert_eq!(ctx.count_rows("subscriptions").await?, 1);
    assert_eq!(ctx.stored_price(KETTLE_URL).await?, "50.00");
    Ok(())
}

#[tokio::test]
async fn test_track_same_pair_twice() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "50", "00"));
    let app = ctx.router();

    let (first, _) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;
    let (second, message) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(message, "You are already tracking this product.");
    assert_eq!(ctx.count_rows("subscriptions").await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_track_same_url_two_emails() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "50", "00"));
    let app = ctx.router();

    let (first, _) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;
    let (second, _) = post_track(&app, track_payload(KETTLE_URL, "ben@example.com")).await?;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
    assert_eq!(ctx.count_rows("products").await?, 1);
    assert_eq!(ctx.count_rows("subscriptions").await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_track_trims_padded_fields() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "50", "00"));
    let app = ctx.router();

    let padded_url = format!("  {}  ", KETTLE_URL);
    let (status, _) = post_track(&app, track_payload(&padded_url, " anna@example.com ")).await?;
    let (again, message) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(again, StatusCode::OK);
    assert_eq!(message, "You are already tracking this product.");
    assert_eq!(ctx.count_rows("subscriptions").await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_known_product_is_not_scraped_again() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "50", "00"));
    let app = ctx.router();

    post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;
    ctx.fetcher.remove_page(KETTLE_URL);
    let (status, _) = post_track(&app, track_payload(KETTLE_URL, "ben@example.com")).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ctx.fetcher.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_track_extraction_failure() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher
        .set_page(KETTLE_URL, "<html><body>Enter the characters you see below</body></html>");
    let app = ctx.router();

    let (status, message) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        message,
        "Failed to retrieve product information. Please verify the product URL."
    );
    assert_eq!(ctx.count_rows("products").await?, 0);
    assert_eq!(ctx.count_rows("subscriptions").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_track_zero_price_is_rejected() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page("Kettle", "0", "00"));
    let app = ctx.router();

    let (status, message) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        message,
        "Failed to retrieve product information. Please verify the product URL."
    );
    assert_eq!(ctx.count_rows("products").await?, 0);
    assert_eq!(ctx.count_rows("subscriptions").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_track_unreachable_page() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    let app = ctx.router();

    let (status, message) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        message,
        "Failed to retrieve product information. Please verify the product URL."
    );
    assert_eq!(ctx.count_rows("products").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_track_missing_fields() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    let app = ctx.router();

    for payload in [
        json!({ "product_url": KETTLE_URL }),
        json!({ "user_email": "anna@example.com" }),
        json!({ "product_url": "", "user_email": "anna@example.com" }),
        json!({}),
    ] {
        let (status, message) = post_track(&app, payload).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Missing product_url or user_email.");
    }
    assert_eq!(ctx.fetcher.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_track_rejects_non_http_url() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    let app = ctx.router();

    let (status, message) =
        post_track(&app, track_payload("ftp://shop.example/kettle", "anna@example.com")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "Invalid product_url.");
    Ok(())
}

#[tokio::test]
async fn test_track_persistence_failure() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "50", "00"));
    let app = ctx.router();
    ctx.db.close().await;

    let (status, message) = post_track(&app, track_payload(KETTLE_URL, "anna@example.com")).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "An error occurred while creating the tracking request.");
    Ok(())
}
