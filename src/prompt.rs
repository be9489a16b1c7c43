use serde::{Deserialize, Serialize};

/// System prompt for the DevOps assistant
pub const SYSTEM_PROMPT: &str = "You are a helpful DevOps assistant specializing in:
- Docker and containerization
- Kubernetes orchestration
- CI/CD pipelines (GitHub Actions, Jenkins, GitLab CI)
- Infrastructure as Code (Terraform, Ansible)
- Cloud platforms (AWS, Azure, GCP)
- Monitoring and logging (Prometheus, Grafana, ELK/EFK stack)
- Linux system administration
- Git and version control
- Security best practices

Provide clear, practical advice with code examples when appropriate.
Be concise but thorough. If you're not sure about something, say so.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Label used when turns are flattened into a single text prompt
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// Role a client may attach to a history turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        }
    }
}

/// One prior message of the conversation, as sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Which prompt representation a backend consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Messages,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembledPrompt {
    Messages(Vec<PromptMessage>),
    Text(String),
}

impl AssembledPrompt {
    pub fn style(&self) -> PromptStyle {
        match self {
            AssembledPrompt::Messages(_) => PromptStyle::Messages,
            AssembledPrompt::Text(_) => PromptStyle::Text,
        }
    }
}

/// Assemble the prompt for one chat request.
///
/// # Arguments
/// * `system` - Fixed system instruction
/// * `history` - Prior turns in chronological order
/// * `message` - The new user message
/// * `style` - Representation expected by the active backend
pub fn assemble(
    system: &str,
    history: &[ChatTurn],
    message: &str,
    style: PromptStyle,
) -> AssembledPrompt {
    match style {
        PromptStyle::Messages => AssembledPrompt::Messages(build_messages(system, history, message)),
        PromptStyle::Text => AssembledPrompt::Text(flatten(system, history, message)),
    }
}

/// System entry, then every history turn unchanged, then the new user message
pub fn build_messages(system: &str, history: &[ChatTurn], message: &str) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(PromptMessage::new(Role::System, system));
    messages.extend(
        history
            .iter()
            .map(|turn| PromptMessage::new(turn.role.into(), turn.content.clone())),
    );
    messages.push(PromptMessage::new(Role::User, message));
    messages
}

/// Flatten the conversation into one prompt ending with an open `Assistant:` cue
pub fn flatten(system: &str, history: &[ChatTurn], message: &str) -> String {
    let mut prompt = format!("{}\n\n", system);
    for turn in history {
        let role: Role = turn.role.into();
        prompt.push_str(&format!("{}: {}\n\n", role.label(), turn.content));
    }
    prompt.push_str(&format!("{}: {}\n\n", Role::User.label(), message));
    prompt.push_str(&format!("{}:", Role::Assistant.label()));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: TurnRole, content: &str) -> ChatTurn {
        ChatTurn {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn empty_history_yields_system_then_message() {
        let messages = build_messages("sys", &[], "How do I restart a pod?");
        assert_eq!(
            messages,
            vec![
                PromptMessage::new(Role::System, "sys"),
                PromptMessage::new(Role::User, "How do I restart a pod?"),
            ]
        );
    }

    #[test]
    fn history_is_kept_in_order_between_system_and_message() {
        let history = vec![
            turn(TurnRole::User, "first"),
            turn(TurnRole::Assistant, "second"),
            turn(TurnRole::User, "third"),
        ];
        let messages = build_messages("sys", &history, "fourth");

        assert_eq!(messages.len(), history.len() + 2);
        assert_eq!(messages[0].role, Role::System);
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "first", "second", "third", "fourth"]);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[4].role, Role::User);
    }

    #[test]
    fn duplicate_turns_are_not_collapsed() {
        let history = vec![turn(TurnRole::User, "same"), turn(TurnRole::User, "same")];
        assert_eq!(build_messages("sys", &history, "same").len(), 4);
    }

    #[test]
    fn flatten_without_history_has_no_dangling_separators() {
        let prompt = flatten("sys", &[], "hello");
        assert_eq!(prompt, "sys\n\nUser: hello\n\nAssistant:");
    }

    #[test]
    fn flatten_labels_each_turn() {
        let history = vec![
            turn(TurnRole::User, "What is k8s?"),
            turn(TurnRole::Assistant, "Kubernetes."),
        ];
        let prompt = flatten("sys", &history, "And helm?");
        assert_eq!(
            prompt,
            "sys\n\nUser: What is k8s?\n\nAssistant: Kubernetes.\n\nUser: And helm?\n\nAssistant:"
        );
    }

    #[test]
    fn assemble_follows_requested_style() {
        let messages = assemble(SYSTEM_PROMPT, &[], "hi", PromptStyle::Messages);
        assert_eq!(messages.style(), PromptStyle::Messages);

        let text = assemble(SYSTEM_PROMPT, &[], "hi", PromptStyle::Text);
        match text {
            AssembledPrompt::Text(t) => {
                assert!(t.starts_with(SYSTEM_PROMPT));
                assert!(t.ends_with("User: hi\n\nAssistant:"));
            }
            other => panic!("expected text prompt, got {:?}", other),
        }
    }

    #[test]
    fn turn_roles_reject_unknown_values() {
        let ok: ChatTurn = serde_json::from_str(r#"{"role":"assistant","content":"x"}"#).unwrap();
        assert_eq!(ok.role, TurnRole::Assistant);
        assert!(serde_json::from_str::<ChatTurn>(r#"{"role":"","content":"x"}"#).is_err());
        assert!(serde_json::from_str::<ChatTurn>(r#"{"role":"system","content":"x"}"#).is_err());
    }
}
