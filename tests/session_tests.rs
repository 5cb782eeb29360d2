mod common;

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream;

use agno_chat::chat::{
    ChatConfig, ChatSession, LineSource, MODE_PROMPT, Renderer, SessionState, USER_PROMPT,
};
use agno_chat::{AgnoClient, ChatBackend, ChatRequest, Error, ResponseMode, Result, TextStream};
use common::spawn_server;

/////////////////////////////////////////// Doubles ///////////////////////////////////////////

/// Backend that answers locally and records what it was sent.
struct FakeBackend {
    healthy: bool,
    sent: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn healthy() -> Self {
        Self {
            healthy: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn down() -> Self {
        Self {
            healthy: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn check_health(&self) -> bool {
        self.healthy
    }

    async fn send(&self, message: &str) -> Result<String> {
        self.sent.lock().unwrap().push(message.to_string());
        if message == "boom" {
            return Err(Error::transport("connection reset by peer", None));
        }
        Ok(format!("reply to {message}"))
    }

    async fn stream(&self, message: &str) -> Result<TextStream> {
        self.sent.lock().unwrap().push(message.to_string());
        let chunks: Vec<Result<String>> = match message {
            "boom" => return Err(Error::status(500, "agent crashed")),
            "cut" => vec![
                Ok("half".to_string()),
                Err(Error::transport("connection reset mid-stream", None)),
            ],
            _ => vec![
                Ok("reply ".to_string()),
                Ok("to ".to_string()),
                Ok(message.to_string()),
            ],
        };
        Ok(Box::pin(stream::iter(chunks)))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Banner,
    Connected,
    ServerDown,
    ModeMenu,
    Mode(ResponseMode),
    Start,
    Text(String),
    Finish,
    Error(String),
    Goodbye,
}

#[derive(Default)]
struct RecordingRenderer {
    events: Vec<Event>,
}

impl RecordingRenderer {
    fn has(&self, event: &Event) -> bool {
        self.events.contains(event)
    }

    fn errors(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn print_banner(&mut self) {
        self.events.push(Event::Banner);
    }

    fn print_connected(&mut self, _: &str) {
        self.events.push(Event::Connected);
    }

    fn print_server_down(&mut self, _: &str) {
        self.events.push(Event::ServerDown);
    }

    fn print_mode_menu(&mut self) {
        self.events.push(Event::ModeMenu);
    }

    fn print_mode(&mut self, mode: ResponseMode) {
        self.events.push(Event::Mode(mode));
    }

    fn start_response(&mut self) {
        self.events.push(Event::Start);
    }

    fn print_text(&mut self, text: &str) {
        self.events.push(Event::Text(text.to_string()));
    }

    fn finish_response(&mut self) {
        self.events.push(Event::Finish);
    }

    fn print_error(&mut self, error: &str) {
        self.events.push(Event::Error(error.to_string()));
    }

    fn print_goodbye(&mut self) {
        self.events.push(Event::Goodbye);
    }
}

/// Input that replays fixed lines, then reports closed input.
struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

async fn run(
    backend: FakeBackend,
    config: ChatConfig,
    lines: &[&str],
) -> (ChatSession<FakeBackend>, ScriptedInput, RecordingRenderer) {
    let mut session = ChatSession::new(backend, config);
    let mut input = ScriptedInput::new(lines);
    let mut renderer = RecordingRenderer::default();
    session.run(&mut input, &mut renderer).await.unwrap();
    (session, input, renderer)
}

//////////////////////////////////////////// Tests ////////////////////////////////////////////

#[tokio::test]
async fn server_down_ends_before_input() {
    let (session, input, renderer) =
        run(FakeBackend::down(), ChatConfig::new(), &["2", "hello"]).await;

    assert_eq!(session.state(), &SessionState::Terminated);
    assert!(!session.stats().connected);
    assert!(renderer.has(&Event::ServerDown));
    assert!(input.prompts.is_empty());
    assert!(session.backend().sent().is_empty());
}

#[tokio::test]
async fn complete_mode_stops_at_sentinel() {
    let (session, input, renderer) = run(
        FakeBackend::healthy(),
        ChatConfig::new(),
        &["2", "hello", "what is one piece?", "exit", "never sent"],
    )
    .await;

    assert_eq!(session.mode(), Some(ResponseMode::Complete));
    assert_eq!(
        session.backend().sent(),
        vec!["hello".to_string(), "what is one piece?".to_string()]
    );
    assert!(renderer.has(&Event::Text("reply to hello".to_string())));
    assert!(renderer.has(&Event::Text("reply to what is one piece?".to_string())));
    assert_eq!(renderer.events.last(), Some(&Event::Goodbye));
    assert_eq!(input.remaining(), 1);
    assert_eq!(session.stats().requests, 2);
    assert_eq!(session.stats().failures, 0);
}

#[tokio::test]
async fn streaming_is_the_default_mode() {
    for choice in ["", "1", "3", "streaming please"] {
        let (session, _, renderer) =
            run(FakeBackend::healthy(), ChatConfig::new(), &[choice, "hi", "quit"]).await;
        assert_eq!(session.mode(), Some(ResponseMode::Streaming), "{choice:?}");
        assert_eq!(renderer.text(), "reply to hi");
    }
}

#[tokio::test]
async fn streamed_chunks_render_in_order() {
    let (_, _, renderer) =
        run(FakeBackend::healthy(), ChatConfig::new(), &["1", "hi", "QUIT"]).await;
    let position = renderer
        .events
        .iter()
        .position(|event| event == &Event::Start)
        .unwrap();
    assert_eq!(
        renderer.events[position..position + 5],
        [
            Event::Start,
            Event::Text("reply ".to_string()),
            Event::Text("to ".to_string()),
            Event::Text("hi".to_string()),
            Event::Finish,
        ]
    );
}

#[tokio::test]
async fn blank_lines_never_dispatch() {
    let (session, input, _) = run(
        FakeBackend::healthy(),
        ChatConfig::new(),
        &["1", "", "   ", "\t", "hi", "", "Exit"],
    )
    .await;

    assert_eq!(session.backend().sent(), vec!["hi".to_string()]);
    let user_prompts = input
        .prompts
        .iter()
        .filter(|prompt| prompt.as_str() == USER_PROMPT)
        .count();
    assert_eq!(user_prompts, 6);
}

#[tokio::test]
async fn messages_are_trimmed_before_sending() {
    let (session, _, _) = run(
        FakeBackend::healthy(),
        ChatConfig::new(),
        &["2", "   top anime?  ", "exit"],
    )
    .await;
    assert_eq!(session.backend().sent(), vec!["top anime?".to_string()]);
}

#[tokio::test]
async fn failed_exchange_keeps_session_alive() {
    let (session, _, renderer) = run(
        FakeBackend::healthy(),
        ChatConfig::new(),
        &["2", "boom", "next", "quit"],
    )
    .await;

    assert_eq!(
        session.backend().sent(),
        vec!["boom".to_string(), "next".to_string()]
    );
    assert_eq!(session.stats().failures, 1);
    assert_eq!(session.stats().requests, 2);
    assert_eq!(session.stats().succeeded(), 1);
    let errors = renderer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("connection reset by peer"));
    assert!(renderer.has(&Event::Text("reply to next".to_string())));
}

#[tokio::test]
async fn interrupted_stream_keeps_printed_text() {
    let (session, _, renderer) = run(
        FakeBackend::healthy(),
        ChatConfig::new(),
        &["1", "cut", "boom", "after", "exit"],
    )
    .await;

    assert_eq!(session.stats().failures, 2);
    assert!(renderer.text().starts_with("half"));
    let errors = renderer.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("mid-stream"));
    assert!(errors[1].contains("500"));
    assert!(renderer.text().ends_with("reply to after"));
}

#[tokio::test]
async fn closed_input_terminates() {
    let (session, _, renderer) =
        run(FakeBackend::healthy(), ChatConfig::new(), &["2", "hello"]).await;
    assert_eq!(session.state(), &SessionState::Terminated);
    assert_eq!(session.backend().sent(), vec!["hello".to_string()]);
    assert!(!renderer.has(&Event::Goodbye));
}

#[tokio::test]
async fn closed_input_at_mode_select() {
    let (session, input, renderer) = run(FakeBackend::healthy(), ChatConfig::new(), &[]).await;
    assert_eq!(session.state(), &SessionState::Terminated);
    assert_eq!(session.mode(), Some(ResponseMode::Streaming));
    assert_eq!(
        input.prompts,
        vec![MODE_PROMPT.to_string(), USER_PROMPT.to_string()]
    );
    assert!(renderer.has(&Event::ModeMenu));
    assert!(session.backend().sent().is_empty());
}

#[tokio::test]
async fn preset_mode_skips_menu() {
    let config = ChatConfig::new().with_mode(Some(ResponseMode::Complete));
    let (session, input, renderer) =
        run(FakeBackend::healthy(), config, &["2", "exit"]).await;

    assert!(!renderer.has(&Event::ModeMenu));
    assert!(renderer.has(&Event::Mode(ResponseMode::Complete)));
    assert!(input.prompts.iter().all(|prompt| prompt == USER_PROMPT));
    // "2" is a message here, not a menu choice.
    assert_eq!(session.backend().sent(), vec!["2".to_string()]);
}

#[tokio::test]
async fn step_walks_the_states() {
    let mut session = ChatSession::new(FakeBackend::healthy(), ChatConfig::new());
    let mut input = ScriptedInput::new(&["1", "hi", "exit"]);
    let mut renderer = RecordingRenderer::default();

    let mut states = vec![session.state().clone()];
    while session.state() != &SessionState::Terminated {
        session.step(&mut input, &mut renderer).await.unwrap();
        states.push(session.state().clone());
    }
    assert_eq!(
        states,
        vec![
            SessionState::Startup,
            SessionState::ModeSelect,
            SessionState::Prompting,
            SessionState::Dispatching("hi".to_string()),
            SessionState::Prompting,
            SessionState::Terminated,
        ]
    );
}

#[tokio::test]
async fn session_against_http_server() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/chat/stream",
            post(
                |State(received): State<Arc<Mutex<Vec<String>>>>,
                 Json(request): Json<ChatRequest>| async move {
                    received.lock().unwrap().push(request.message.clone());
                    let chunks = vec![
                        Ok::<_, Infallible>("echo: ".to_string()),
                        Ok(request.message),
                    ];
                    Body::from_stream(stream::iter(chunks))
                },
            ),
        )
        .with_state(Arc::clone(&received));
    let base_url = spawn_server(router).await;

    let client = AgnoClient::new(&base_url).unwrap();
    let mut session = ChatSession::new(client, ChatConfig::new().with_base_url(base_url));
    let mut input = ScriptedInput::new(&["1", "first", "", "second", "exit", "third"]);
    let mut renderer = RecordingRenderer::default();
    let stats = session.run(&mut input, &mut renderer).await.unwrap();

    assert!(stats.connected);
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.failures, 0);
    assert_eq!(
        *received.lock().unwrap(),
        vec!["first".to_string(), "second".to_string()]
    );
    assert_eq!(renderer.text(), "echo: firstecho: second");
}
