use super::*;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ConceptServerState {
    concepts: Arc<Mutex<Vec<Concept>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

async fn handle_list(State(state): State<ConceptServerState>) -> Json<Vec<Concept>> {
    state.requests.lock().await.push("GET".to_string());
    Json(state.concepts.lock().await.clone())
}

async fn handle_create(
    State(state): State<ConceptServerState>,
    Json(concept): Json<Concept>,
) -> StatusCode {
    state.requests.lock().await.push("POST".to_string());
    state.concepts.lock().await.push(concept);
    StatusCode::CREATED
}

async fn handle_update(
    State(state): State<ConceptServerState>,
    Query(query): Query<ConceptIdQuery>,
    Json(concept): Json<Concept>,
) -> StatusCode {
    state
        .requests
        .lock()
        .await
        .push(format!("PUT {}", query.concept_id));
    let mut concepts = state.concepts.lock().await;
    match concepts
        .iter_mut()
        .find(|existing| existing.concept_id == query.concept_id)
    {
        Some(existing) => {
            *existing = concept;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn handle_delete(
    State(state): State<ConceptServerState>,
    Query(query): Query<ConceptIdQuery>,
) -> StatusCode {
    state
        .requests
        .lock()
        .await
        .push(format!("DELETE {}", query.concept_id));
    state
        .concepts
        .lock()
        .await
        .retain(|existing| existing.concept_id != query.concept_id);
    StatusCode::NO_CONTENT
}

async fn handle_broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn handle_garbage() -> &'static str {
    "<html>not json</html>"
}

async fn spawn_concept_server(seed: Vec<Concept>) -> (String, ConceptServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ConceptServerState {
        concepts: Arc::new(Mutex::new(seed)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route(
            "/prod/concepts",
            get(handle_list)
                .post(handle_create)
                .put(handle_update)
                .delete(handle_delete),
        )
        .route("/broken", get(handle_broken))
        .route("/garbage", get(handle_garbage))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn hypertension() -> Concept {
    Concept::new(
        "C001",
        "Hypertension",
        "A condition in which the force of the blood against the artery walls is too high.",
        "High Blood Pressure",
    )
    .with_hierarchy(&["P001", "P002"], &["C002", "C003"])
}

#[tokio::test]
async fn fetch_all_decodes_camel_case_collection() {
    let (base, _state) = spawn_concept_server(vec![hypertension()]).await;
    let store = HttpConceptStore::new(format!("{base}/prod/concepts"));

    let concepts = store.fetch_all().await.expect("fetch");

    assert_eq!(concepts, vec![hypertension()]);
}

#[tokio::test]
async fn created_concept_is_visible_on_next_fetch() {
    let (base, state) = spawn_concept_server(Vec::new()).await;
    let store = HttpConceptStore::new(format!("{base}/prod/concepts"));

    store
        .create(&Concept::new("C1", "Foo", "d", ""))
        .await
        .expect("create");
    let concepts = store.fetch_all().await.expect("fetch");

    assert!(concepts
        .iter()
        .any(|concept| concept.concept_id == ConceptId::from("C1")));
    assert_eq!(
        state.requests.lock().await.as_slice(),
        &["POST".to_string(), "GET".to_string()]
    );
}

#[tokio::test]
async fn update_and_delete_address_record_by_query_parameter() {
    let (base, state) = spawn_concept_server(vec![hypertension()]).await;
    let store = HttpConceptStore::new(format!("{base}/prod/concepts"));

    let mut edited = hypertension();
    edited.display_name = "Arterial Hypertension".to_string();
    store
        .update(&ConceptId::from("C001"), &edited)
        .await
        .expect("update");
    assert_eq!(
        state.concepts.lock().await[0].display_name,
        "Arterial Hypertension"
    );
    assert_eq!(state.concepts.lock().await[0].parent_ids.len(), 2);

    store
        .delete(&ConceptId::from("C001"))
        .await
        .expect("delete");
    assert!(state.concepts.lock().await.is_empty());
    assert_eq!(
        state.requests.lock().await.as_slice(),
        &["PUT C001".to_string(), "DELETE C001".to_string()]
    );
}

#[tokio::test]
async fn update_of_unknown_record_reports_status() {
    let (base, _state) = spawn_concept_server(Vec::new()).await;
    let store = HttpConceptStore::new(format!("{base}/prod/concepts"));

    let err = store
        .update(&ConceptId::from("missing"), &Concept::new("missing", "", "", ""))
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn server_error_maps_to_status_failure() {
    let (base, _state) = spawn_concept_server(Vec::new()).await;
    let store = HttpConceptStore::new(format!("{base}/broken"));

    let err = store.fetch_all().await.expect_err("must fail");

    assert!(matches!(err, FetchError::Status(_)));
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.user_message(), "request failed");
}

#[tokio::test]
async fn malformed_body_maps_to_decode_failure() {
    let (base, _state) = spawn_concept_server(Vec::new()).await;
    let store = HttpConceptStore::new(format!("{base}/garbage"));

    let err = store.fetch_all().await.expect_err("must fail");

    assert!(matches!(err, FetchError::Decode(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_server_maps_to_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let store = HttpConceptStore::new(format!("http://{addr}/prod/concepts"));

    let err = store.fetch_all().await.expect_err("must fail");

    assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {err}");
    assert_eq!(err.status(), None);
}
