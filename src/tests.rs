//! End-to-end client tests against a mocked PocketBase server.

use crate::client::{BeforeSendResult, FormData, SendOptions};
use crate::models::{Admin, AuthModel, Collection, Record};
use crate::stores::AuthStore;
use crate::{Client, ClientConfig, ClientError, QueryParams};
use mockito::{Matcher, Server, ServerGuard};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::time::sleep;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn setup() -> (ServerGuard, Client) {
    init_tracing();
    let server = Server::new_async().await;
    let client = Client::new(server.url());
    (server, client)
}

/// A server that accepts connections and never answers.
async fn hanging_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut sockets = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            sockets.push(socket);
        }
    });
    format!("http://{}", addr)
}

fn users_record() -> Value {
    json!({
        "id": "u1",
        "collectionId": "_pb_users_",
        "collectionName": "users",
        "email": "test@example.com",
        "name": "Test"
    })
}

// ========== Headers ==========

#[tokio::test]
async fn test_health_check_sends_default_headers() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/health")
        .match_header("accept-language", "en-US")
        .match_header("content-type", "application/json")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"API is healthy."}"#)
        .create_async()
        .await;

    let health = client.health().check(QueryParams::new()).await.unwrap();
    assert_eq!(health.code, 200);
    assert_eq!(health.message, "API is healthy.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stored_token_is_sent() {
    let (mut server, client) = setup().await;
    client.auth_store().save("stored-token", None).unwrap();

    let mock = server
        .mock("GET", "/api/health")
        .match_header("authorization", "stored-token")
        .with_body(r#"{"code":200,"message":"ok"}"#)
        .create_async()
        .await;

    client.health().check(QueryParams::new()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_explicit_headers_are_kept() {
    let (mut server, client) = setup().await;
    client.auth_store().save("stored-token", None).unwrap();

    let mock = server
        .mock("GET", "/api/custom")
        .match_header("accept-language", "pl-PL")
        .match_header("authorization", "explicit")
        .match_header("content-type", "text/plain")
        .with_body("{}")
        .create_async()
        .await;

    let options = SendOptions::get()
        .header("accept-language", "pl-PL")
        .header("Authorization", "explicit")
        .header("Content-Type", "text/plain");
    client.send_value("/api/custom", options).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_configured_lang() {
    init_tracing();
    let mut server = Server::new_async().await;
    let client = Client::with_config(ClientConfig {
        base_url: server.url(),
        lang: "de-DE".into(),
        ..Default::default()
    });

    let mock = server
        .mock("GET", "/api/health")
        .match_header("accept-language", "de-DE")
        .with_body(r#"{"code":200,"message":"ok"}"#)
        .create_async()
        .await;

    client.health().check(QueryParams::new()).await.unwrap();
    mock.assert_async().await;
}

// ========== Query & body ==========

#[tokio::test]
async fn test_query_params_are_serialized() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("perPage".into(), "10".into()),
            Matcher::UrlEncoded("filter".into(), "title ~ 'a b'".into()),
            Matcher::UrlEncoded("tag".into(), "x".into()),
            Matcher::UrlEncoded("tag".into(), "y".into()),
        ]))
        .with_body(r#"{"page":2,"perPage":10,"totalItems":0,"totalPages":0,"items":[]}"#)
        .create_async()
        .await;

    let params = QueryParams::new()
        .set("filter", "title ~ 'a b'")
        .set("tag", vec!["x", "y"])
        .set("skipped", None::<String>)
        .auto_cancel(false);

    let list = client.collection("posts").get_list(2, 10, params).await.unwrap();
    assert_eq!(list.page, 2);
    assert!(list.items.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_sends_json_body() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/collections/posts/records")
        .match_query(Matcher::UrlEncoded("expand".into(), "author".into()))
        .match_body(Matcher::Json(json!({"title": "Hello"})))
        .with_body(r#"{"id":"p1","collectionId":"c1","collectionName":"posts","title":"Hello"}"#)
        .create_async()
        .await;

    let record = client
        .collection("posts")
        .create(json!({"title": "Hello"}), QueryParams::new().set("expand", "author"))
        .await
        .unwrap();

    assert_eq!(record.id, "p1");
    assert_eq!(record.get_str("title"), "Hello");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_multipart_body_skips_json_content_type() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/collections/posts/records")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::Regex("hello file".into()))
        .with_body(r#"{"id":"p1","collectionId":"c1","collectionName":"posts"}"#)
        .create_async()
        .await;

    let form = FormData::new()
        .text("title", "with file")
        .file_with_mime("document", "a.txt", b"hello file".to_vec(), "text/plain");

    client
        .collection("posts")
        .create(form, QueryParams::new())
        .await
        .unwrap();
    mock.assert_async().await;
}

// ========== Errors ==========

#[tokio::test]
async fn test_error_status_is_normalized() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/collections/posts/records")
        .with_status(400)
        .with_body(
            r#"{"code":400,"message":"Failed to create record.","data":{"title":{"code":"validation_required","message":"Missing required value."}}}"#,
        )
        .create_async()
        .await;

    let err = client
        .collection("posts")
        .create(json!({}), QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), 400);
    assert_eq!(err.message(), "Failed to create record.");
    assert_eq!(err.data()["title"]["code"], "validation_required");
    assert!(err.url().unwrap().ends_with("/api/collections/posts/records"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transport_error_is_normalized() {
    init_tracing();
    // nothing listens on port 9 locally
    let client = Client::new("http://127.0.0.1:9");
    let err = client.health().check(QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(err.status(), 0);
}

#[tokio::test]
async fn test_retries_retryable_status() {
    init_tracing();
    let mut server = Server::new_async().await;
    let client = Client::with_config(ClientConfig {
        base_url: server.url(),
        max_retries: 2,
        retry_delay_ms: 1,
        ..Default::default()
    });

    let mock = server
        .mock("GET", "/api/health")
        .with_status(503)
        .with_body(r#"{"code":503,"message":"busy"}"#)
        .expect(3)
        .create_async()
        .await;

    let err = client.health().check(QueryParams::new()).await.unwrap_err();
    assert_eq!(err.status(), 503);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_first_list_item_not_found() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("perPage".into(), "1".into()),
            Matcher::UrlEncoded("filter".into(), "slug='missing'".into()),
        ]))
        .with_body(r#"{"page":1,"perPage":1,"totalItems":0,"totalPages":0,"items":[]}"#)
        .create_async()
        .await;

    let err = client
        .collection("posts")
        .get_first_list_item("slug='missing'", QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), 404);
    assert_eq!(err.message(), "The requested resource wasn't found.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_one_with_empty_id_skips_request() {
    let (_server, client) = setup().await;
    let err = client
        .collection("posts")
        .get_one("", QueryParams::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 404);
}

// ========== CRUD ==========

#[tokio::test]
async fn test_get_full_list_pages_until_total() {
    let (mut server, client) = setup().await;
    let page1 = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("perPage".into(), "2".into()),
        ]))
        .with_body(r#"{"page":1,"perPage":2,"totalItems":3,"totalPages":2,"items":[{"id":"a"},{"id":"b"}]}"#)
        .create_async()
        .await;
    let page2 = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("perPage".into(), "2".into()),
        ]))
        .with_body(r#"{"page":2,"perPage":2,"totalItems":3,"totalPages":2,"items":[{"id":"c"}]}"#)
        .create_async()
        .await;

    let items = client
        .collection("posts")
        .get_full_list(2, QueryParams::new())
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn test_get_one_encodes_id() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/admins/a%2Fb")
        .with_body(r#"{"id":"a/b","email":"admin@example.com","avatar":2}"#)
        .create_async()
        .await;

    let admin = client.admins().get_one("a/b", QueryParams::new()).await.unwrap();
    assert_eq!(admin.email, "admin@example.com");
    assert_eq!(admin.avatar, 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_with_empty_response() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("DELETE", "/api/collections/posts/records/p1")
        .with_status(204)
        .create_async()
        .await;

    assert!(client
        .collection("posts")
        .delete("p1", QueryParams::new())
        .await
        .unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_collections_import() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("PUT", "/api/collections/import")
        .match_body(Matcher::PartialJson(json!({
            "collections": [{"name": "notes", "type": "base"}],
            "deleteMissing": true
        })))
        .with_status(204)
        .create_async()
        .await;

    let collections = vec![Collection {
        name: "notes".into(),
        ..Default::default()
    }];
    assert!(client
        .collections()
        .import(&collections, true, QueryParams::new())
        .await
        .unwrap());
    mock.assert_async().await;
}

// ========== Auth ==========

#[tokio::test]
async fn test_record_auth_with_password_saves_store() {
    let (mut server, client) = setup().await;
    let auth = server
        .mock("POST", "/api/collections/users/auth-with-password")
        .match_body(Matcher::Json(json!({"identity": "test@example.com", "password": "123456"})))
        .with_body(json!({"token": "tok123", "record": users_record()}).to_string())
        .create_async()
        .await;
    let health = server
        .mock("GET", "/api/health")
        .match_header("authorization", "tok123")
        .with_body(r#"{"code":200,"message":"ok"}"#)
        .create_async()
        .await;

    let response = client
        .collection("users")
        .auth_with_password("test@example.com", "123456", QueryParams::new())
        .await
        .unwrap();

    assert_eq!(response.token, "tok123");
    assert_eq!(client.auth_store().token(), "tok123");
    assert!(client.auth_store().is_auth_record());

    client.health().check(QueryParams::new()).await.unwrap();
    auth.assert_async().await;
    health.assert_async().await;
}

#[tokio::test]
async fn test_update_and_delete_of_current_record_sync_store() {
    let (mut server, client) = setup().await;
    client
        .auth_store()
        .save("tok", Some(AuthModel::Record(Record::from_value(users_record()))))
        .unwrap();

    let mut updated = users_record();
    updated["name"] = json!("Renamed");
    let update = server
        .mock("PATCH", "/api/collections/users/records/u1")
        .with_body(updated.to_string())
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/collections/users/records/u1")
        .with_status(204)
        .create_async()
        .await;

    let users = client.collection("users");
    users
        .update("u1", json!({"name": "Renamed"}), QueryParams::new())
        .await
        .unwrap();

    let model = client.auth_store().model().unwrap();
    assert_eq!(model.as_record().unwrap().get_str("name"), "Renamed");
    assert_eq!(client.auth_store().token(), "tok");

    users.delete("u1", QueryParams::new()).await.unwrap();
    assert_eq!(client.auth_store().token(), "");
    assert!(client.auth_store().model().is_none());

    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_admin_auth_with_password() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/admins/auth-with-password")
        .match_body(Matcher::Json(json!({"identity": "admin@example.com", "password": "secret"})))
        .with_body(r#"{"token":"admintok","admin":{"id":"a1","email":"admin@example.com","avatar":1}}"#)
        .create_async()
        .await;

    let response = client
        .admins()
        .auth_with_password("admin@example.com", "secret", QueryParams::new())
        .await
        .unwrap();

    assert_eq!(response.admin.id, "a1");
    assert!(client.auth_store().is_admin());
    assert_eq!(client.auth_store().token(), "admintok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_auth_leaves_store_untouched() {
    let (mut server, client) = setup().await;
    client.auth_store().save("previous", None).unwrap();

    let mock = server
        .mock("POST", "/api/collections/users/auth-with-password")
        .with_status(400)
        .with_body(r#"{"code":400,"message":"Failed to authenticate.","data":{}}"#)
        .create_async()
        .await;

    let err = client
        .collection("users")
        .auth_with_password("x", "y", QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Failed to authenticate.");
    assert_eq!(client.auth_store().token(), "previous");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_external_auths() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/collections/users/records/u1/external-auths")
        .with_body(r#"[{"id":"e1","recordId":"u1","collectionId":"_pb_users_","provider":"github","providerId":"42"}]"#)
        .create_async()
        .await;

    let auths = client
        .collection("users")
        .list_external_auths("u1", QueryParams::new())
        .await
        .unwrap();

    assert_eq!(auths.len(), 1);
    assert_eq!(auths[0].provider, "github");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_file_token() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/files/token")
        .with_body(r#"{"token":"filetok"}"#)
        .create_async()
        .await;

    assert_eq!(client.files().get_token(QueryParams::new()).await.unwrap(), "filetok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_logs_stats() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/logs/requests/stats")
        .match_query(Matcher::UrlEncoded("filter".into(), "status >= 400".into()))
        .with_body(r#"[{"total":4,"date":"2022-06-01 19:00:00.000"}]"#)
        .create_async()
        .await;

    let stats = client
        .logs()
        .get_requests_stats(QueryParams::new().set("filter", "status >= 400"))
        .await
        .unwrap();

    assert_eq!(stats[0].total, 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_settings_test_email() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/settings/test/email")
        .match_body(Matcher::Json(json!({"email": "to@example.com", "template": "verification"})))
        .with_status(204)
        .create_async()
        .await;

    assert!(client
        .settings()
        .test_email("to@example.com", "verification", QueryParams::new())
        .await
        .unwrap());
    mock.assert_async().await;
}

// ========== Hooks ==========

#[tokio::test]
async fn test_before_send_can_replace_url_and_options() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/rewritten")
        .match_header("x-custom-header", "example")
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let base = server.url();
    client.set_before_send(move |_url, options| BeforeSendResult {
        url: Some(format!("{}/api/rewritten", base)),
        options: Some(options.clone().header("X-Custom-Header", "example")),
    });

    let data = client
        .send_value("/api/initial", SendOptions::get())
        .await
        .unwrap();
    assert_eq!(data["ok"], true);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_after_send_can_transform_and_reject() {
    let (mut server, client) = setup().await;
    let _mock = server
        .mock("GET", "/api/health")
        .with_body(r#"{"code":200,"message":"ok"}"#)
        .create_async()
        .await;

    client.set_after_send(|info, mut data| {
        assert_eq!(info.status, 200);
        data["message"] = json!("patched");
        Ok(data)
    });
    let health = client.health().check(QueryParams::new()).await.unwrap();
    assert_eq!(health.message, "patched");

    client.set_after_send(|info, _| {
        Err(ClientError::Response {
            url: info.url.clone(),
            status: 418,
            data: json!({"message": "rejected"}),
        })
    });
    let err = client.health().check(QueryParams::new()).await.unwrap_err();
    assert_eq!(err.status(), 418);

    client.clear_after_send();
    client.health().check(QueryParams::new()).await.unwrap();
}

// ========== Cancellation ==========

#[tokio::test]
async fn test_duplicated_request_is_auto_cancelled() {
    init_tracing();
    let client = Client::new(hanging_server().await);

    let c1 = client.clone();
    let first = tokio::spawn(async move { c1.send_value("/api/slow", SendOptions::get()).await });
    sleep(Duration::from_millis(50)).await;

    let c2 = client.clone();
    let second = tokio::spawn(async move { c2.send_value("/api/slow", SendOptions::get()).await });

    let first_err = first.await.unwrap().unwrap_err();
    assert!(first_err.is_abort());

    client.cancel_request("GET/api/slow");
    let second_err = second.await.unwrap().unwrap_err();
    assert!(second_err.is_abort());
}

#[tokio::test]
async fn test_custom_cancel_key_and_cancel_all() {
    init_tracing();
    let client = Client::new(hanging_server().await);

    let c1 = client.clone();
    let keyed = tokio::spawn(async move {
        c1.send_value(
            "/api/a",
            SendOptions::get().params(QueryParams::new().cancel_key("custom")),
        )
        .await
    });
    let c2 = client.clone();
    let other = tokio::spawn(async move { c2.send_value("/api/b", SendOptions::get()).await });
    sleep(Duration::from_millis(50)).await;

    client.cancel_request("custom");
    assert!(keyed.await.unwrap().unwrap_err().is_abort());

    client.cancel_all_requests();
    assert!(other.await.unwrap().unwrap_err().is_abort());
}

#[tokio::test]
async fn test_auto_cancel_opt_out_is_not_cancellable() {
    init_tracing();
    let client = Client::new(hanging_server().await);

    let c1 = client.clone();
    let request = tokio::spawn(async move {
        c1.send_value(
            "/api/slow",
            SendOptions::get().params(QueryParams::new().auto_cancel(false)),
        )
        .await
    });
    sleep(Duration::from_millis(50)).await;

    client.cancel_all_requests();
    let still_pending = tokio::time::timeout(Duration::from_millis(100), request).await;
    assert!(still_pending.is_err());
}

#[tokio::test]
async fn test_global_auto_cancellation_off() {
    init_tracing();
    let client = Client::new(hanging_server().await);
    client.auto_cancellation(false);

    let c1 = client.clone();
    let first = tokio::spawn(async move { c1.send_value("/api/slow", SendOptions::get()).await });
    sleep(Duration::from_millis(50)).await;
    let c2 = client.clone();
    let _second = tokio::spawn(async move { c2.send_value("/api/slow", SendOptions::get()).await });

    let still_pending = tokio::time::timeout(Duration::from_millis(100), first).await;
    assert!(still_pending.is_err());
}

// ========== Response bodies ==========

#[tokio::test]
async fn test_non_json_success_body_is_an_error() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/collections/posts/records/r1")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>proxy login page</html>")
        .create_async()
        .await;

    let err = client
        .collection("posts")
        .get_one("r1", QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Json(_)));
    assert_eq!(err.status(), 0);
    assert!(!err.is_retryable());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/collections/users/request-verification")
        .with_status(204)
        .create_async()
        .await;

    let data = client
        .send_value(
            "/api/collections/users/request-verification",
            SendOptions::post(),
        )
        .await
        .unwrap();

    assert_eq!(data, Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_error_body_becomes_empty_object() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/health")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = client.health().check(QueryParams::new()).await.unwrap_err();
    assert_eq!(err.status(), 502);
    assert_eq!(err.response(), json!({}));
    assert_eq!(err.data(), json!({}));
    mock.assert_async().await;
}

// ========== Request construction ==========

#[tokio::test]
async fn test_invalid_header_fails_without_retries() {
    init_tracing();
    let mut server = Server::new_async().await;
    let client = Client::with_config(ClientConfig {
        base_url: server.url(),
        max_retries: 2,
        retry_delay_ms: 300,
        ..Default::default()
    });

    let mock = server
        .mock("GET", "/api/health")
        .expect(0)
        .create_async()
        .await;

    let started = Instant::now();
    let err = client
        .send_value("/api/health", SendOptions::get().header("bad header", "v"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidHeader(_)));
    assert!(!err.is_retryable());
    assert!(started.elapsed() < Duration::from_millis(300));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_base_url() {
    init_tracing();
    let client = Client::new("not a url");
    let err = client.health().check(QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidUrl(_)));
    assert!(!err.is_retryable());
}

// ========== Paging ==========

#[tokio::test]
async fn test_get_list_zero_arguments_use_defaults() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("perPage".into(), "30".into()),
        ]))
        .with_body(r#"{"page":1,"perPage":30,"totalItems":0,"totalPages":0,"items":[]}"#)
        .create_async()
        .await;

    let list = client
        .collection("posts")
        .get_list(0, 0, QueryParams::new())
        .await
        .unwrap();
    assert_eq!(list.per_page, 30);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_full_list_stops_on_empty_page() {
    let (mut server, client) = setup().await;
    let page1 = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_body(r#"{"page":1,"perPage":2,"totalItems":10,"totalPages":5,"items":[{"id":"a"},{"id":"b"}]}"#)
        .create_async()
        .await;
    let page2 = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_body(r#"{"page":2,"perPage":2,"totalItems":10,"totalPages":5,"items":[]}"#)
        .create_async()
        .await;

    let items = client
        .collection("posts")
        .get_full_list(2, QueryParams::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn test_get_full_list_without_totals_stops_on_short_page() {
    let (mut server, client) = setup().await;
    let page1 = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_body(r#"{"page":1,"perPage":2,"totalItems":-1,"totalPages":-1,"items":[{"id":"a"},{"id":"b"}]}"#)
        .create_async()
        .await;
    let page2 = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_body(r#"{"page":2,"perPage":2,"totalItems":-1,"totalPages":-1,"items":[{"id":"c"}]}"#)
        .create_async()
        .await;

    let items = client
        .collection("posts")
        .get_full_list(2, QueryParams::new().set("skipTotal", true))
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    page1.assert_async().await;
    page2.assert_async().await;
}

// ========== Auth sync ==========

fn current_admin() -> AuthModel {
    AuthModel::Admin(Admin {
        id: "a1".into(),
        email: "admin@example.com".into(),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_update_and_delete_of_current_admin_sync_store() {
    let (mut server, client) = setup().await;
    client.auth_store().save("admintok", Some(current_admin())).unwrap();

    let update = server
        .mock("PATCH", "/api/admins/a1")
        .with_body(r#"{"id":"a1","email":"renamed@example.com","avatar":4}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/admins/a1")
        .with_status(204)
        .create_async()
        .await;

    client
        .admins()
        .update("a1", json!({"email": "renamed@example.com"}), QueryParams::new())
        .await
        .unwrap();

    let model = client.auth_store().model().unwrap();
    assert_eq!(model.as_admin().unwrap().email, "renamed@example.com");
    assert_eq!(client.auth_store().token(), "admintok");

    client.admins().delete("a1", QueryParams::new()).await.unwrap();
    assert_eq!(client.auth_store().token(), "");
    assert!(client.auth_store().model().is_none());

    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_update_of_other_admin_leaves_store() {
    let (mut server, client) = setup().await;
    client.auth_store().save("admintok", Some(current_admin())).unwrap();

    let mock = server
        .mock("PATCH", "/api/admins/a2")
        .with_body(r#"{"id":"a2","email":"other@example.com"}"#)
        .create_async()
        .await;

    client
        .admins()
        .update("a2", json!({"email": "other@example.com"}), QueryParams::new())
        .await
        .unwrap();

    let model = client.auth_store().model().unwrap();
    assert_eq!(model.as_admin().unwrap().email, "admin@example.com");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_record_auth_refresh_saves_store() {
    let (mut server, client) = setup().await;
    client
        .auth_store()
        .save("old", Some(AuthModel::Record(Record::from_value(users_record()))))
        .unwrap();

    let mock = server
        .mock("POST", "/api/collections/users/auth-refresh")
        .match_header("authorization", "old")
        .with_body(json!({"token": "refreshed", "record": users_record()}).to_string())
        .create_async()
        .await;

    let response = client
        .collection("users")
        .auth_refresh(QueryParams::new())
        .await
        .unwrap();

    assert_eq!(response.record.id, "u1");
    assert_eq!(client.auth_store().token(), "refreshed");
    assert!(client.auth_store().is_auth_record());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_admin_auth_refresh_saves_store() {
    let (mut server, client) = setup().await;
    client.auth_store().save("old", Some(current_admin())).unwrap();

    let mock = server
        .mock("POST", "/api/admins/auth-refresh")
        .match_header("authorization", "old")
        .with_body(r#"{"token":"refreshed","admin":{"id":"a1","email":"admin@example.com"}}"#)
        .create_async()
        .await;

    client.admins().auth_refresh(QueryParams::new()).await.unwrap();

    assert_eq!(client.auth_store().token(), "refreshed");
    assert!(client.auth_store().is_admin());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_auth_with_oauth2_saves_store() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/api/collections/users/auth-with-oauth2")
        .match_body(Matcher::Json(json!({
            "provider": "github",
            "code": "auth-code",
            "codeVerifier": "verifier",
            "redirectUrl": "https://app.example.com/callback",
            "createData": {"name": "New User"}
        })))
        .with_body(
            json!({
                "token": "oauthtok",
                "record": users_record(),
                "meta": {"isNew": true}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = client
        .collection("users")
        .auth_with_oauth2(
            "github",
            "auth-code",
            "verifier",
            "https://app.example.com/callback",
            json!({"name": "New User"}).as_object().cloned(),
            QueryParams::new(),
        )
        .await
        .unwrap();

    assert_eq!(response.meta.unwrap()["isNew"], true);
    assert_eq!(client.auth_store().token(), "oauthtok");
    assert_eq!(client.auth_store().model().unwrap().id(), "u1");
    mock.assert_async().await;
}

// ========== Cancellation control keys ==========

#[tokio::test]
async fn test_control_keys_are_not_sent() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/collections/posts/records")
        .match_query(Matcher::Any)
        .with_body(r#"{"page":1,"perPage":30,"totalItems":0,"totalPages":0,"items":[]}"#)
        .create_async()
        .await;

    let seen = Arc::new(Mutex::new(String::new()));
    let seen_url = seen.clone();
    client.set_after_send(move |info, data| {
        *seen_url.lock() = info.url.clone();
        Ok(data)
    });

    let params = QueryParams::new()
        .set("$autoCancel", false)
        .set("$cancelKey", "posts")
        .set("sort", "-created");
    client.collection("posts").get_list(1, 30, params).await.unwrap();

    let url = seen.lock().clone();
    assert!(url.ends_with("/api/collections/posts/records?sort=-created&page=1&perPage=30"));
    assert!(!url.contains("cancelKey"));
    assert!(!url.contains("autoCancel"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_raw_cancel_key_param() {
    init_tracing();
    let client = Client::new(hanging_server().await);

    let c1 = client.clone();
    let request = tokio::spawn(async move {
        c1.send_value(
            "/api/slow",
            SendOptions::get().params(QueryParams::new().set("$cancelKey", "raw-key")),
        )
        .await
    });
    sleep(Duration::from_millis(50)).await;

    client.cancel_request("raw-key");
    assert!(request.await.unwrap().unwrap_err().is_abort());
}

#[tokio::test]
async fn test_raw_auto_cancel_param() {
    init_tracing();
    let client = Client::new(hanging_server().await);

    let c1 = client.clone();
    let request = tokio::spawn(async move {
        c1.send_value(
            "/api/slow",
            SendOptions::get().params(QueryParams::new().set("$autoCancel", false)),
        )
        .await
    });
    sleep(Duration::from_millis(50)).await;

    client.cancel_request("GET/api/slow");
    let still_pending = tokio::time::timeout(Duration::from_millis(100), request).await;
    assert!(still_pending.is_err());
}

#[tokio::test]
async fn test_empty_cancel_key_uses_default_key() {
    init_tracing();
    let client = Client::new(hanging_server().await);

    let c1 = client.clone();
    let request = tokio::spawn(async move {
        c1.send_value(
            "/api/slow",
            SendOptions::get().params(QueryParams::new().cancel_key("")),
        )
        .await
    });
    sleep(Duration::from_millis(50)).await;

    client.cancel_request("GET/api/slow");
    assert!(request.await.unwrap().unwrap_err().is_abort());
}
