use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;

use crate::config::{BackendKind, Settings};
use crate::error::ChatError;
use crate::llm::LLMInterface;
use crate::prompt::{AssembledPrompt, PromptStyle};

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn test_settings(kind: BackendKind) -> Settings {
    Settings {
        llm_backend: match kind {
            BackendKind::OpenAI => "openai".to_string(),
            BackendKind::Ollama => "ollama".to_string(),
        },
        openai_api_key: Some("sk-test".to_string()),
        openai_base_url: "http://127.0.0.1:9".to_string(),
        ollama_url: "http://127.0.0.1:9".to_string(),
        ollama_model: "llama2".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        debug: false,
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
    }
}

pub enum FakeReply {
    Text(String),
    Timeout,
    Backend(String),
    Panic,
}

/// Backend double that records every call
pub struct FakeLLM {
    style: PromptStyle,
    reply: FakeReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<AssembledPrompt>>,
}

impl FakeLLM {
    pub fn new(style: PromptStyle, reply: FakeReply) -> Self {
        Self {
            style,
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<AssembledPrompt> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMInterface for FakeLLM {
    fn name(&self) -> &str {
        "fake"
    }

    fn prompt_style(&self) -> PromptStyle {
        self.style
    }

    async fn generate(&self, prompt: &AssembledPrompt) -> Result<String, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.clone());
        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Timeout => Err(ChatError::Timeout("operation timed out".to_string())),
            FakeReply::Backend(detail) => Err(ChatError::Backend(detail.clone())),
            FakeReply::Panic => panic!("backend exploded"),
        }
    }
}
