//! Handlers that run an external command per event

use crate::error::HandlerError;
use crate::handler::EventHandler;
use async_trait::async_trait;
use hookwire_events::Event;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Environment variable carrying the event tag
pub const EVENT_ENV: &str = "HOOKWIRE_EVENT";

/// Environment variable carrying the event ID
pub const EVENT_ID_ENV: &str = "HOOKWIRE_EVENT_ID";

/// Runs a program with the raw event JSON on stdin.
///
/// A non-zero exit status fails the handler with the captured stderr. The
/// child is killed if the handler future is dropped (timeout or
/// cancellation).
#[derive(Debug, Clone)]
pub struct CommandHandler {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl CommandHandler {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl EventHandler for CommandHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        let payload = serde_json::to_vec(event.raw())?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(&self.env)
            .env(EVENT_ENV, event.tag().as_str())
            .env(EVENT_ID_ENV, event.id().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HandlerError::Io(format!("{}: {}", self.program.display(), e)))?;

        let stdin = child.stdin.take();
        let write = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            // A child that exits without reading stdin closes the pipe early.
            match stdin.write_all(&payload).await {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            }
        };

        // The child may fill stdout before it drains stdin.
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;
        written?;
        debug!(
            handler = %self.name,
            status = %output.status,
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "External handler finished"
        );

        if output.status.success() {
            Ok(())
        } else {
            Err(HandlerError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use hookwire_events::{EventTag, FieldSchema, Parser, SchemaRegistry};
    use std::sync::Arc;

    fn event() -> Event {
        let mut schemas = SchemaRegistry::new();
        schemas.register(EventTag::PushSent, FieldSchema::new());
        Parser::new(Arc::new(schemas))
            .parse(EventTag::PushSent, r#"{"type":"Computer"}"#)
            .unwrap()
    }

    fn shell(name: &str, script: &str) -> CommandHandler {
        CommandHandler::new(name, "/bin/sh").with_args(["-c", script])
    }

    #[tokio::test]
    async fn test_payload_on_stdin() {
        let handler = shell("grep", r#"grep -q '"type":"Computer"'"#);
        assert!(handler.handle(&event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_event_environment() {
        let handler = shell("env", r#"test "$HOOKWIRE_EVENT" = PushSent && test -n "$HOOKWIRE_EVENT_ID""#);
        assert!(handler.handle(&event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_custom_environment() {
        let handler = shell("env", r#"test "$CHANNEL" = it"#).with_env("CHANNEL", "it");
        assert!(handler.handle(&event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_zero_exit_reports_stderr() {
        let handler = shell("fails", "echo boom >&2; exit 3");
        match handler.handle(&event()).await {
            Err(HandlerError::CommandFailed { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_large_payload_with_chatty_child() {
        let mut schemas = SchemaRegistry::new();
        schemas.register(EventTag::PushSent, FieldSchema::new());
        let raw = format!(r#"{{"blob":"{}"}}"#, "x".repeat(512 * 1024));
        let event = Parser::new(Arc::new(schemas))
            .parse(EventTag::PushSent, &raw)
            .unwrap();

        let handler = shell("chatty", "head -c 262144 /dev/zero; cat >/dev/null");
        let result = tokio::time::timeout(Duration::from_secs(10), handler.handle(&event)).await;

        assert!(matches!(result, Ok(Ok(()))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let handler = CommandHandler::new("missing", "/nonexistent/hookwire-handler");
        assert!(matches!(
            handler.handle(&event()).await,
            Err(HandlerError::Io(_))
        ));
    }
}
