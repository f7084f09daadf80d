use axum::http::{Method, StatusCode};
use serde_json::json;

use super::{TestApp, product_body};

#[tokio::test]
async fn sku_is_unique_per_store() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;
    let (_, globex) = app.store("Globex").await;

    let reply = app.post("/v1/products", Some(&acme.token), product_body("TEA-1")).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["title"], "Product created");

    let reply = app.post("/v1/products", Some(&acme.token), product_body("TEA-1")).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "product_already_exists");

    let reply = app.post("/v1/products", Some(&globex.token), product_body("TEA-1")).await;
    assert_eq!(reply.status, StatusCode::CREATED);
}

#[tokio::test]
async fn other_stores_products_are_not_found() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;
    let (_, globex) = app.store("Globex").await;

    let mut draft = product_body("TEA-1");
    draft["is_published"] = json!(false);
    let reply = app.post("/v1/products", Some(&acme.token), draft).await;
    let id = reply.body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/v1/products/{id}");

    let reply = app.get(&uri, Some(&globex.token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "product_not_found");

    let reply = app.patch(&uri, Some(&globex.token), json!({"price": 1})).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = app.delete(&uri, Some(&globex.token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    // Still there for its owner
    let reply = app.get(&uri, Some(&acme.token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["price"], 1_250);

    let reply = app.delete(&uri, Some(&acme.token)).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn public_view_hides_drafts_and_download_links() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;

    let mut ebook = product_body("EBOOK");
    ebook["is_digital"] = json!(true);
    ebook["digital_download_link"] = json!("https://files.example.com/ebook.pdf");
    let reply = app.post("/v1/products", Some(&acme.token), ebook).await;
    let ebook_id = reply.body["data"]["id"].as_str().unwrap().to_string();

    let mut draft = product_body("DRAFT");
    draft["is_published"] = json!(false);
    let reply = app.post("/v1/products", Some(&acme.token), draft).await;
    let draft_id = reply.body["data"]["id"].as_str().unwrap().to_string();

    let reply = app.get(&format!("/v1/products/{ebook_id}"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["store_name"], "Acme");
    assert!(reply.body["data"].get("digital_download_link").is_none());

    let reply = app.get(&format!("/v1/products/{draft_id}"), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = app.get("/v1/products", None).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 1);

    let reply = app.get("/v1/products", Some(&acme.token)).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn pagination_windows_and_defaults() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;

    for i in 0..15 {
        let reply = app
            .post("/v1/products", Some(&acme.token), product_body(&format!("SKU-{i:02}")))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
    }

    let first = app.get("/v1/products?page=1&limit=10", None).await;
    let second = app.get("/v1/products?page=2&limit=10", None).await;
    let first = first.body["data"].as_array().unwrap().clone();
    let second = second.body["data"].as_array().unwrap().clone();
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 5);
    assert!(second.iter().all(|p| !first.contains(p)));

    let reply = app.get("/v1/products?page=abc&limit=-3", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"].as_array().unwrap(), &first);

    let reply = app.get("/v1/products?query=sku-1", Some(&acme.token)).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn empty_category_id_is_absent() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;

    let reply = app
        .post("/v1/categories", Some(&acme.token), json!({"name": "Drinks"}))
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let category_id = reply.body["data"]["id"].as_str().unwrap().to_string();

    let mut body = product_body("TEA-1");
    body["category_id"] = json!("");
    let reply = app.post("/v1/products", Some(&acme.token), body).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert!(reply.body["data"]["category_id"].is_null());
    let uri = format!("/v1/products/{}", reply.body["data"]["id"].as_str().unwrap());

    let reply = app
        .patch(&uri, Some(&acme.token), json!({"category_id": category_id}))
        .await;
    assert_eq!(reply.body["data"]["category_id"], category_id.as_str());

    let reply = app.patch(&uri, Some(&acme.token), json!({"category_id": ""})).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["data"]["category_id"].is_null());
    assert_eq!(reply.body["data"]["sku"], "TEA-1");
}

#[tokio::test]
async fn category_of_another_store_is_rejected() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;
    let (_, globex) = app.store("Globex").await;

    let reply = app
        .post("/v1/categories", Some(&globex.token), json!({"name": "Drinks"}))
        .await;
    let foreign = reply.body["data"]["id"].as_str().unwrap().to_string();

    let mut body = product_body("TEA-1");
    body["category_id"] = json!(foreign);
    let reply = app.post("/v1/products", Some(&acme.token), body).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["code"], "product_data_invalid");
    assert!(reply.body["errors"]["category_id"].is_array());
}

#[tokio::test]
async fn digital_products_need_a_link_after_merge() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;

    let reply = app.post("/v1/products", Some(&acme.token), product_body("TEA-1")).await;
    let uri = format!("/v1/products/{}", reply.body["data"]["id"].as_str().unwrap());

    let reply = app.patch(&uri, Some(&acme.token), json!({"is_digital": true})).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body["errors"]["digital_download_link"].is_array());
}

#[tokio::test]
async fn attributes_are_unique_per_product() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;

    let reply = app.post("/v1/products", Some(&acme.token), product_body("TEA-1")).await;
    let id = reply.body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/v1/products/{id}/attributes");
    let attribute = json!({"key": "origin", "value": "Darjeeling"});

    let reply = app.request(Method::PUT, &uri, Some(&acme.token), Some(attribute.clone())).await;
    assert_eq!(reply.status, StatusCode::CREATED);

    let reply = app.request(Method::PUT, &uri, Some(&acme.token), Some(attribute)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "product_attribute_already_exists");

    let reply = app.get(&format!("/v1/products/{id}"), None).await;
    assert_eq!(reply.body["data"]["attributes"][0]["value"], "Darjeeling");

    let reply = app.delete(&format!("{uri}/origin"), Some(&acme.token)).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = app.delete(&format!("{uri}/origin"), Some(&acme.token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "product_attribute_not_found");
}

#[tokio::test]
async fn writes_require_store_staff() {
    let app = TestApp::new();
    let shopper = app.user("shopper@example.com").await;

    let reply = app.post("/v1/products", None, product_body("TEA-1")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app.post("/v1/products", Some(&shopper.token), product_body("TEA-1")).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "user_not_store_staff");
}

#[tokio::test]
async fn category_lifecycle() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;
    let (_, globex) = app.store("Globex").await;

    let reply = app
        .post("/v1/categories", Some(&acme.token), json!({"name": "Drinks"}))
        .await;
    let id = reply.body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/v1/categories/{id}");

    let reply = app
        .post("/v1/categories", Some(&acme.token), json!({"name": "Drinks"}))
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "category_already_exists");

    let reply = app.patch(&uri, Some(&globex.token), json!({"name": "Stolen"})).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "category_not_found");

    let reply = app.patch(&uri, Some(&acme.token), json!({"name": "Hot Drinks"})).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["name"], "Hot Drinks");

    let mut body = product_body("TEA-1");
    body["category_id"] = json!(id);
    let reply = app.post("/v1/products", Some(&acme.token), body).await;
    let product_uri = format!("/v1/products/{}", reply.body["data"]["id"].as_str().unwrap());

    let reply = app.get("/v1/categories", None).await;
    assert_eq!(reply.body["data"][0]["name"], "Hot Drinks");

    let reply = app.delete(&uri, Some(&acme.token)).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = app.get(&product_uri, Some(&acme.token)).await;
    assert!(reply.body["data"]["category_id"].is_null());
}

#[tokio::test]
async fn whitespace_names_and_runaway_prices_are_rejected() {
    let app = TestApp::new();
    let (_, acme) = app.store("Acme").await;

    let mut body = product_body("TEA-1");
    body["name"] = json!("   ");
    body["price"] = json!(i64::MAX);
    let reply = app.post("/v1/products", Some(&acme.token), body).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["code"], "product_data_invalid");
    assert!(reply.body["errors"]["name"].is_array());
    assert!(reply.body["errors"]["price"].is_array());

    let reply = app
        .post("/v1/categories", Some(&acme.token), json!({"name": " \t "}))
        .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body["errors"]["name"].is_array());

    let reply = app.post("/v1/products", Some(&acme.token), product_body("TEA-1")).await;
    let uri = format!("/v1/products/{}", reply.body["data"]["id"].as_str().unwrap());
    let reply = app.patch(&uri, Some(&acme.token), json!({"sku": "  "})).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body["errors"]["sku"].is_array());
}
