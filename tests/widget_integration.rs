use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chat_widget::config::{DEFAULT_FALLBACK_REPLY, DEFAULT_GREETING};
use chat_widget::surface::{LogNode, Message, MessageLog, MessageRole};
use chat_widget::transport::HttpTransport;
use chat_widget::widget::{ChatWidget, WidgetSettings, spawn_widget};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Stand-in for the chat service, recording what it was sent.
#[derive(Clone, Default)]
struct MockService {
    chats: Arc<Mutex<Vec<(String, String)>>>,
    resets: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    fn chat_sessions(&self) -> Vec<String> {
        self.chats
            .lock()
            .unwrap()
            .iter()
            .map(|(_, session)| session.clone())
            .collect()
    }

    fn resets(&self) -> Vec<String> {
        self.resets.lock().unwrap().clone()
    }
}

async fn chat(State(svc): State<MockService>, Json(body): Json<Value>) -> Response {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let session = body["session_id"].as_str().unwrap_or("default").to_string();
    svc.chats.lock().unwrap().push((message.clone(), session));

    match message.as_str() {
        "" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No message provided" })),
        )
            .into_response(),
        "break" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garble" => (StatusCode::OK, "this is not json").into_response(),
        "How do I stay calm on match point?" => {
            Json(json!({ "response": "Breathe and reset between points." })).into_response()
        }
        other => Json(json!({ "response": format!("You said: {other}") })).into_response(),
    }
}

async fn new_chat(State(svc): State<MockService>, Json(body): Json<Value>) -> Json<Value> {
    let session = body["session_id"].as_str().unwrap_or("default").to_string();
    svc.resets.lock().unwrap().push(session);
    Json(json!({ "status": "ok" }))
}

async fn start_service(svc: MockService) -> String {
    let app = Router::new()
        .route("/chat", post(chat))
        .route("/new-chat", post(new_chat))
        .with_state(svc);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

const AVATAR: &str = "/static/guru.png";

fn mounted(base_url: &str) -> (ChatWidget<MessageLog>, MessageLog) {
    let transport = HttpTransport::new(base_url).expect("valid base url");
    let log = MessageLog::with_avatar(Some(AVATAR.into()));
    let mut widget = ChatWidget::new(
        Arc::new(transport),
        log.clone(),
        WidgetSettings {
            request_timeout: Duration::from_secs(5),
            ..WidgetSettings::default()
        },
    );
    widget.mount();
    (widget, log)
}

#[tokio::test]
async fn test_match_point_scenario() {
    let svc = MockService::default();
    let base = start_service(svc.clone()).await;
    let (mut widget, log) = mounted(&base);

    assert!(widget.submit_message("How do I stay calm on match point?").await);

    assert_eq!(
        log.last_message(),
        Some(Message::bot("Breathe and reset between points."))
    );
    assert!(log.input_enabled());
    assert_eq!(log.typing_count(), 0);
    assert_eq!(svc.chat_sessions(), vec![widget.session_id().to_string()]);
}

#[tokio::test]
async fn test_bot_nodes_carry_avatar() {
    let base = start_service(MockService::default()).await;
    let (mut widget, log) = mounted(&base);

    widget.submit_message("topspin").await;

    let avatar = Some(AVATAR.to_string());
    assert_eq!(
        log.nodes(),
        vec![
            LogNode::Message {
                role: MessageRole::Bot,
                content: DEFAULT_GREETING.to_string(),
                avatar: avatar.clone(),
            },
            LogNode::Message {
                role: MessageRole::User,
                content: "topspin".to_string(),
                avatar: None,
            },
            LogNode::Message {
                role: MessageRole::Bot,
                content: "You said: topspin".to_string(),
                avatar,
            },
        ]
    );
}

#[tokio::test]
async fn test_error_status_shows_fallback() {
    let base = start_service(MockService::default()).await;
    let (mut widget, log) = mounted(&base);

    widget.submit_message("break").await;

    assert_eq!(log.last_message(), Some(Message::bot(DEFAULT_FALLBACK_REPLY)));
    assert!(log.input_enabled());
}

#[tokio::test]
async fn test_malformed_body_shows_fallback() {
    let base = start_service(MockService::default()).await;
    let (mut widget, log) = mounted(&base);

    widget.submit_message("garble").await;

    assert_eq!(log.last_message(), Some(Message::bot(DEFAULT_FALLBACK_REPLY)));
}

#[tokio::test]
async fn test_unreachable_service_shows_fallback() {
    let base = unreachable_url().await;
    let (mut widget, log) = mounted(&base);

    assert!(widget.submit_message("hello?").await);

    assert_eq!(log.count(MessageRole::User), 1);
    assert_eq!(log.last_message(), Some(Message::bot(DEFAULT_FALLBACK_REPLY)));
    assert!(log.input_enabled());
}

#[tokio::test]
async fn test_reset_notifies_service_with_old_session() {
    let svc = MockService::default();
    let base = start_service(svc.clone()).await;
    let (mut widget, log) = mounted(&base);

    widget.submit_message("first rally").await;
    let old = widget.session_id().to_string();

    widget.reset_conversation().await;
    assert_eq!(log.messages(), vec![Message::bot(DEFAULT_GREETING)]);
    assert_eq!(svc.resets(), vec![old.clone()]);

    widget.submit_message("second rally").await;
    let sessions = svc.chat_sessions();
    assert_eq!(sessions[0], old);
    assert_eq!(sessions[1], widget.session_id().to_string());
    assert_ne!(sessions[1], old);
}

#[tokio::test]
async fn test_reset_clears_even_when_service_is_down() {
    let base = unreachable_url().await;
    let (mut widget, log) = mounted(&base);
    let old = widget.session_id().clone();

    widget.submit_message("anyone?").await;
    widget.reset_conversation().await;

    assert_eq!(log.messages(), vec![Message::bot(DEFAULT_GREETING)]);
    assert_ne!(widget.session_id(), &old);
}

#[tokio::test]
async fn test_event_loop_against_live_service() {
    let svc = MockService::default();
    let base = start_service(svc.clone()).await;
    let (widget, log) = mounted(&base);
    let (handle, task) = spawn_widget(widget);

    handle.submit("   ");
    handle.submit("serve and volley");
    tokio::time::timeout(Duration::from_secs(5), async {
        while log.count(MessageRole::Bot) < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("reply rendered");

    handle.shutdown();
    task.await.unwrap();

    assert_eq!(
        log.messages(),
        vec![
            Message::bot(DEFAULT_GREETING),
            Message::user("serve and volley"),
            Message::bot("You said: serve and volley"),
        ]
    );
    assert_eq!(svc.chat_sessions().len(), 1);
}
