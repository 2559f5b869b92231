//! Integration tests driving the full router — pages and API — over an
//! in-memory store.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use rolo_core::{contact::ContactDraft, store::ContactStore as _};
use rolo_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use super::*;

// ─── Harness ─────────────────────────────────────────────────────────────────

async fn make_state_with_sizes(
  password: &str,
  page_size: u64,
  api_page_size: u64,
) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string();

  AppState {
    store:     Arc::new(store),
    config:    Arc::new(ServerConfig {
      host: "127.0.0.1".to_string(),
      port: 8080,
      store_path: std::path::PathBuf::from(":memory:"),
      auth_username: "user".to_string(),
      auth_password_hash: hash.clone(),
      page_size,
      api_page_size,
    }),
    auth:      Arc::new(AuthConfig {
      username:      "user".to_string(),
      password_hash: hash,
    }),
    templates: Arc::new(render::environment()),
  }
}

async fn make_state(password: &str) -> AppState<SqliteStore> {
  make_state_with_sizes(password, 5, 10).await
}

fn auth_header(user: &str, pass: &str) -> String {
  format!("Basic {}", B64.encode(format!("{user}:{pass}")))
}

async fn oneshot_raw(
  state: AppState<SqliteStore>,
  method: &str,
  uri: &str,
  headers: Vec<(header::HeaderName, &str)>,
  body: &str,
) -> axum::response::Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn draft(
  first: &str,
  last: &str,
  phone: &str,
  email: &str,
  city: &str,
  status_id: Option<i64>,
) -> ContactDraft {
  ContactDraft {
    first_name:   first.into(),
    last_name:    last.into(),
    phone_number: phone.into(),
    email:        email.into(),
    city:         city.into(),
    status_id,
  }
}

/// Seed the standard snapshot: Active status, John Doe and Jane Smith.
/// Returns `(active_status_id, john_contact_id)`.
async fn seed(state: &AppState<SqliteStore>) -> (i64, i64) {
  let active = state.store.create_status("Active".into()).await.unwrap();
  let john = state
    .store
    .create_contact(draft(
      "John", "Doe", "123456789", "john@example.com", "New York",
      Some(active.id),
    ))
    .await
    .unwrap();
  state
    .store
    .create_contact(draft(
      "Jane", "Smith", "987654321", "jane@example.com", "Los Angeles",
      Some(active.id),
    ))
    .await
    .unwrap();
  (active.id, john.id)
}

const FORM: (header::HeaderName, &str) =
  (header::CONTENT_TYPE, "application/x-www-form-urlencoded");
const JSON: (header::HeaderName, &str) =
  (header::CONTENT_TYPE, "application/json");

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthenticated_page_request_returns_401() {
  let state = make_state("secret").await;
  let resp = oneshot_raw(state, "GET", "/", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn unauthenticated_write_never_touches_the_store() {
  let state = make_state("secret").await;
  seed(&state).await;

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/create/",
    vec![FORM],
    "first_name=Eve&last_name=Intruder&phone_number=999999999&email=eve@example.com&city=Nowhere",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/api/contacts",
    vec![JSON],
    r#"{"first_name":"Eve","last_name":"Intruder","phone_number":"999999999","email":"eve@example.com","city":"Nowhere"}"#,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  assert_eq!(state.store.count_contacts().await.unwrap(), 2);
}

#[tokio::test]
async fn wrong_password_returns_401() {
  let state = make_state("secret").await;
  let auth = auth_header("user", "wrong");
  let resp = oneshot_raw(
    state,
    "GET",
    "/",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ─── Contact list page ───────────────────────────────────────────────────────

#[tokio::test]
async fn list_renders_rows_in_last_name_order() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  let doe = body.find("John Doe").expect("John Doe rendered");
  let smith = body.find("Jane Smith").expect("Jane Smith rendered");
  assert!(doe < smith, "default order is last name ascending");
}

#[tokio::test]
async fn list_sort_descending_reverses_rows() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/?sort=-last_name",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let body = body_string(resp).await;
  assert!(body.find("Jane Smith").unwrap() < body.find("John Doe").unwrap());
}

#[tokio::test]
async fn list_unknown_sort_falls_back_to_default() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/?sort=phone_number",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.find("John Doe").unwrap() < body.find("Jane Smith").unwrap());
}

#[tokio::test]
async fn list_search_filters_rows() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/?q=JANE@EXAMPLE.com",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let body = body_string(resp).await;
  assert!(body.contains("Jane Smith"));
  assert!(!body.contains("John Doe"));
}

#[tokio::test]
async fn list_search_matches_city_on_this_surface() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/?q=New%20York",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let body = body_string(resp).await;
  assert!(body.contains("John Doe"));
  assert!(!body.contains("Jane Smith"));
}

#[tokio::test]
async fn list_filters_by_status() {
  let state = make_state("secret").await;
  seed(&state).await;
  let archived = state.store.create_status("Archived".into()).await.unwrap();
  state
    .store
    .create_contact(draft(
      "Bob", "Brown", "111222333", "bob@example.com", "Dallas",
      Some(archived.id),
    ))
    .await
    .unwrap();
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    &format!("/?status={}", archived.id),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let body = body_string(resp).await;
  assert!(body.contains("Bob Brown"));
  assert!(!body.contains("John Doe"));
  assert!(!body.contains("Jane Smith"));
}

#[tokio::test]
async fn list_nonnumeric_status_is_ignored() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/?status=archived",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("John Doe"));
  assert!(body.contains("Jane Smith"));
}

#[tokio::test]
async fn list_bad_page_is_a_client_error() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  for uri in ["/?page=-1", "/?page=abc", "/?page=0"] {
    let resp = oneshot_raw(
      state.clone(),
      "GET",
      uri,
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
  }
}

#[tokio::test]
async fn list_past_end_page_is_empty_not_an_error() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/?page=9999",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("No contacts found."));
}

#[tokio::test]
async fn list_paginates_with_controls() {
  let state = make_state_with_sizes("secret", 2, 10).await;
  seed(&state).await;
  state
    .store
    .create_contact(draft(
      "Zoe", "Zimmer", "555666777", "zoe@example.com", "Zagreb", None,
    ))
    .await
    .unwrap();
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let body = body_string(resp).await;
  assert!(body.contains("Page 1 of 2"));
  assert!(body.contains("Next"));
  assert!(!body.contains("Zimmer"), "third row lands on page two");

  let resp = oneshot_raw(
    state,
    "GET",
    "/?page=2",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let body = body_string(resp).await;
  assert!(body.contains("Zimmer"));
  assert!(body.contains("Previous"));
}

// ─── Contact detail / forms ──────────────────────────────────────────────────

#[tokio::test]
async fn detail_renders_and_missing_id_is_404() {
  let state = make_state("secret").await;
  let (_, john_id) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    &format!("/{john_id}/"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("john@example.com"));
  assert!(body.contains("Active"));

  let resp = oneshot_raw(
    state,
    "GET",
    "/424242/",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_posts_then_redirects_to_the_list() {
  let state = make_state("secret").await;
  let (active_id, _) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/create/",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = format!(
    "first_name=Alice&last_name=Johnson&phone_number=555123456\
     &email=alice.johnson@example.com&city=Chicago&status={active_id}"
  );
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/create/",
    vec![(header::AUTHORIZATION, auth.as_str()), FORM],
    &body,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

  assert_eq!(state.store.count_contacts().await.unwrap(), 3);
}

#[tokio::test]
async fn create_with_short_phone_rerenders_with_the_message() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/create/",
    vec![(header::AUTHORIZATION, auth.as_str()), FORM],
    "first_name=Alice&last_name=Johnson&phone_number=123&email=alice@example.com&city=Chicago",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("Phone number must be 9 digits long."));
  assert!(body.contains("value=\"Alice\""), "submitted values echoed back");

  assert_eq!(state.store.count_contacts().await.unwrap(), 2);
}

#[tokio::test]
async fn create_with_duplicate_email_rerenders_and_writes_nothing() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/create/",
    vec![(header::AUTHORIZATION, auth.as_str()), FORM],
    "first_name=Johnny&last_name=Dough&phone_number=555000111&email=john@example.com&city=Boston",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("contact with this email already exists."));

  assert_eq!(state.store.count_contacts().await.unwrap(), 2);
}

#[tokio::test]
async fn update_changes_fields_but_not_created_at() {
  let state = make_state("secret").await;
  let (active_id, john_id) = seed(&state).await;
  let before = state.store.get_contact(john_id).await.unwrap().unwrap();
  let auth = auth_header("user", "secret");

  let body = format!(
    "first_name=John&last_name=Doe&phone_number=123456789\
     &email=john@example.com&city=Boston&status={active_id}"
  );
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    &format!("/update/{john_id}/"),
    vec![(header::AUTHORIZATION, auth.as_str()), FORM],
    &body,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let after = state.store.get_contact(john_id).await.unwrap().unwrap();
  assert_eq!(after.city, "Boston");
  assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn delete_confirms_then_deletes() {
  let state = make_state("secret").await;
  let (_, john_id) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    &format!("/delete/{john_id}/"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("John Doe"));

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    &format!("/delete/{john_id}/"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(state.store.count_contacts().await.unwrap(), 1);
  assert!(state.store.get_contact(john_id).await.unwrap().is_none());
}

// ─── Status pages ────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_pages_create_rename_and_cascade_delete() {
  let state = make_state("secret").await;
  let (active_id, _) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/statuses/",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert!(body_string(resp).await.contains("Active"));

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/statuses/create/",
    vec![(header::AUTHORIZATION, auth.as_str()), FORM],
    "name=Archived",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(state.store.list_statuses().await.unwrap().len(), 2);

  // A colliding name re-renders the form instead of writing.
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/statuses/create/",
    vec![(header::AUTHORIZATION, auth.as_str()), FORM],
    "name=Archived",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(
    body_string(resp)
      .await
      .contains("status with this name already exists.")
  );
  assert_eq!(state.store.list_statuses().await.unwrap().len(), 2);

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    &format!("/statuses/{active_id}/update/"),
    vec![(header::AUTHORIZATION, auth.as_str()), FORM],
    "name=Current",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let renamed = state.store.get_status(active_id).await.unwrap().unwrap();
  assert_eq!(renamed.name, "Current");

  // Deleting the status takes both seeded contacts with it.
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    &format!("/statuses/{active_id}/delete/"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(state.store.count_contacts().await.unwrap(), 0);
}

// ─── JSON API ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn api_list_returns_the_envelope() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/api/contacts",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let json = body_json(resp).await;
  assert_eq!(json["count"], 2);
  assert_eq!(json["next"], serde_json::Value::Null);
  assert_eq!(json["previous"], serde_json::Value::Null);
  assert_eq!(json["results"].as_array().unwrap().len(), 2);
  assert_eq!(json["results"][0]["last_name"], "Doe");
}

#[tokio::test]
async fn api_detail_nests_the_status() {
  let state = make_state("secret").await;
  let (_, john_id) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    &format!("/api/contacts/{john_id}"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let json = body_json(resp).await;
  assert_eq!(json["first_name"], "John");
  assert_eq!(json["email"], "john@example.com");
  assert_eq!(json["status"]["name"], "Active");
  assert!(json.get("status_id").is_none(), "write-only field absent on read");
}

#[tokio::test]
async fn api_create_then_read_back_round_trips() {
  let state = make_state("secret").await;
  let (active_id, _) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let body = format!(
    r#"{{"first_name":"Alice","last_name":"Johnson","phone_number":"555123456",
        "email":"alice@example.com","city":"Chicago","status_id":{active_id}}}"#
  );
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/api/contacts",
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    &body,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = body_json(resp).await;
  let id = created["id"].as_i64().unwrap();
  assert_eq!(created["status"]["id"], active_id);

  let resp = oneshot_raw(
    state,
    "GET",
    &format!("/api/contacts/{id}"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let fetched = body_json(resp).await;
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn api_create_duplicate_email_is_a_field_error() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/api/contacts",
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    r#"{"first_name":"Johnny","last_name":"Dough","phone_number":"555000111","email":"john@example.com","city":"Boston"}"#,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let json = body_json(resp).await;
  assert_eq!(json["email"][0], "contact with this email already exists.");
  assert_eq!(state.store.count_contacts().await.unwrap(), 2);
}

#[tokio::test]
async fn api_create_with_missing_fields_reports_each_one() {
  let state = make_state("secret").await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "POST",
    "/api/contacts",
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    "{}",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let json = body_json(resp).await;
  for field in ["first_name", "last_name", "phone_number", "email", "city"] {
    assert_eq!(json[field][0], "This field is required.", "{field}");
  }
}

#[tokio::test]
async fn api_create_with_unknown_status_reports_the_reference() {
  let state = make_state("secret").await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "POST",
    "/api/contacts",
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    r#"{"first_name":"Ann","last_name":"Lee","phone_number":"111111111","email":"ann@example.com","city":"Austin","status_id":999}"#,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let json = body_json(resp).await;
  assert!(json.get("status_id").is_some());
}

#[tokio::test]
async fn api_put_replaces_and_patch_merges() {
  let state = make_state("secret").await;
  let (active_id, john_id) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let body = format!(
    r#"{{"first_name":"John","last_name":"Doe","phone_number":"123456789",
        "email":"john@example.com","city":"Boston","status_id":{active_id}}}"#
  );
  let resp = oneshot_raw(
    state.clone(),
    "PUT",
    &format!("/api/contacts/{john_id}"),
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    &body,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["city"], "Boston");

  let resp = oneshot_raw(
    state.clone(),
    "PATCH",
    &format!("/api/contacts/{john_id}"),
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    r#"{"city":"Miami"}"#,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let json = body_json(resp).await;
  assert_eq!(json["city"], "Miami");
  assert_eq!(json["first_name"], "John", "untouched fields survive a patch");
  assert_eq!(json["status"]["name"], "Active");
}

#[tokio::test]
async fn api_patch_with_null_status_clears_it() {
  let state = make_state("secret").await;
  let (_, john_id) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "PATCH",
    &format!("/api/contacts/{john_id}"),
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    r#"{"status_id":null}"#,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["status"], serde_json::Value::Null);
}

#[tokio::test]
async fn api_delete_returns_204_then_404() {
  let state = make_state("secret").await;
  let (_, john_id) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "DELETE",
    &format!("/api/contacts/{john_id}"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = oneshot_raw(
    state,
    "GET",
    &format!("/api/contacts/{john_id}"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_search_scope_excludes_city_and_phone() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/api/contacts?search=jane@example.com",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let json = body_json(resp).await;
  assert_eq!(json["count"], 1);
  assert_eq!(json["results"][0]["first_name"], "Jane");

  let resp = oneshot_raw(
    state,
    "GET",
    "/api/contacts?search=New%20York",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(body_json(resp).await["count"], 0);
}

#[tokio::test]
async fn api_filters_by_status_and_exact_city() {
  let state = make_state("secret").await;
  seed(&state).await;
  let archived = state.store.create_status("Archived".into()).await.unwrap();
  state
    .store
    .create_contact(draft(
      "Bob", "Brown", "111222333", "bob@example.com", "Dallas",
      Some(archived.id),
    ))
    .await
    .unwrap();
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    &format!("/api/contacts?status={}", archived.id),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let json = body_json(resp).await;
  assert_eq!(json["count"], 1);
  assert_eq!(json["results"][0]["last_name"], "Brown");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/api/contacts?city=New%20York",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(body_json(resp).await["count"], 1);

  // Exact match is case-sensitive.
  let resp = oneshot_raw(
    state,
    "GET",
    "/api/contacts?city=new%20york",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(body_json(resp).await["count"], 0);
}

#[tokio::test]
async fn api_ordering_param_reverses_results() {
  let state = make_state("secret").await;
  seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state,
    "GET",
    "/api/contacts?ordering=-last_name",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let json = body_json(resp).await;
  assert_eq!(json["results"][0]["last_name"], "Smith");
}

#[tokio::test]
async fn api_pagination_indicators() {
  let state = make_state_with_sizes("secret", 5, 2).await;
  seed(&state).await;
  state
    .store
    .create_contact(draft(
      "Zoe", "Zimmer", "555666777", "zoe@example.com", "Zagreb", None,
    ))
    .await
    .unwrap();
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/api/contacts",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let json = body_json(resp).await;
  assert_eq!(json["count"], 3);
  assert_eq!(json["next"], 2);
  assert_eq!(json["previous"], serde_json::Value::Null);
  assert_eq!(json["results"].as_array().unwrap().len(), 2);

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/api/contacts?page=2",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  let json = body_json(resp).await;
  assert_eq!(json["previous"], 1);
  assert_eq!(json["next"], serde_json::Value::Null);
  assert_eq!(json["results"].as_array().unwrap().len(), 1);

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/api/contacts?page=0",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = oneshot_raw(
    state,
    "GET",
    "/api/contacts?page=9999",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let json = body_json(resp).await;
  assert_eq!(json["count"], 3);
  assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn api_statuses_are_read_only() {
  let state = make_state("secret").await;
  let (active_id, _) = seed(&state).await;
  let auth = auth_header("user", "secret");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    "/api/statuses",
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let json = body_json(resp).await;
  assert_eq!(json[0]["name"], "Active");

  let resp = oneshot_raw(
    state.clone(),
    "GET",
    &format!("/api/statuses/{active_id}"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/api/statuses",
    vec![(header::AUTHORIZATION, auth.as_str()), JSON],
    r#"{"name":"Archived"}"#,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

  let resp = oneshot_raw(
    state,
    "DELETE",
    &format!("/api/statuses/{active_id}"),
    vec![(header::AUTHORIZATION, auth.as_str())],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
