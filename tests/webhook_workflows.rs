//! End-to-end workflows through the facade crate.

use hookwire::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

// =============================================================================
// Trait Handlers
// =============================================================================

struct PolicyAudit {
    failures: Arc<AtomicU32>,
}

#[async_trait]
impl EventHandler for PolicyAudit {
    fn name(&self) -> &str {
        "policy-audit"
    }

    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        let policy = event
            .field_i64("policyId")
            .ok_or_else(|| HandlerError::failed("policyId missing"))?;
        if policy <= 0 {
            return Err(HandlerError::failed("invalid policyId"));
        }
        if event.field_bool("successful") != Some(true) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
        tokio::task::yield_now().await;
        Ok(())
    }
}

#[tokio::test]
async fn test_policy_finished_workflow() {
    let failures = Arc::new(AtomicU32::new(0));
    let receiver = WebhookReceiver::builder()
        .register(
            EventTag::ComputerPolicyFinished,
            PolicyAudit {
                failures: failures.clone(),
            },
        )
        .build();

    let sample = hookwire::events::builtin::sample_for(EventTag::ComputerPolicyFinished);
    let report = receiver.receive_envelope(sample).await.unwrap();
    assert_eq!(report.status, DispatchStatus::AllSucceeded);

    let mut failed: serde_json::Value = serde_json::from_str(sample).unwrap();
    failed["event"]["successful"] = serde_json::Value::Bool(false);
    receiver
        .receive_envelope(&failed.to_string())
        .await
        .unwrap();

    assert_eq!(failures.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_receives_share_frozen_registries() {
    let count = Arc::new(AtomicU32::new(0));
    let seen = count.clone();
    let receiver = WebhookReceiver::builder()
        .register(
            EventTag::MobileDeviceCheckIn,
            handler_fn("count", move |_: &Event| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .build();

    let sample = hookwire::events::builtin::sample_for(EventTag::MobileDeviceCheckIn);
    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let receiver = receiver.clone();
            tokio::spawn(async move { receiver.receive_envelope(sample).await })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        let report = task.await.unwrap().unwrap();
        assert_eq!(report.status, DispatchStatus::AllSucceeded);
        ids.push(report.event_id);
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
    assert_eq!(count.load(Ordering::SeqCst), 16);
}

// =============================================================================
// Configuration
// =============================================================================

#[cfg(all(unix, feature = "config"))]
#[tokio::test]
async fn test_configured_receiver() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let handlers = dir.path().join("handlers");
    fs::create_dir(&handlers).unwrap();

    let script = handlers.join("ComputerCheckIn-record.sh");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\nprintf '%s' \"$HOOKWIRE_EVENT\" > {}\n",
            dir.path().join("tag.txt").display()
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    fs::write(
        dir.path().join("schemas.json"),
        r#"{"ComputerCheckIn": [{"name": "udid", "type": "string"}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("hookwire.toml"),
        r#"
handler_dirs = ["handlers"]
schema_file = "schemas.json"

[dispatch]
handler_timeout_secs = 10
"#,
    )
    .unwrap();

    let config = HookwireConfig::load_with_env(
        dir.path().join("hookwire.toml"),
        &Default::default(),
    )
    .unwrap();

    let mut builder = WebhookReceiver::builder()
        .schemas(config.schema_registry().unwrap())
        .config(config.dispatch_config());
    for source in config.handler_sources() {
        builder = builder.load_handlers(&source);
    }
    assert!(builder.load_errors().is_empty());
    let receiver = builder.build();

    let err = receiver
        .receive(EventTag::ComputerCheckIn, "{}")
        .await
        .unwrap_err();
    assert!(matches!(err, ParseError::SchemaViolation { .. }));

    let report = receiver
        .receive(EventTag::ComputerCheckIn, r#"{"udid":"ABC123"}"#)
        .await
        .unwrap();
    assert_eq!(report.status, DispatchStatus::AllSucceeded);
    assert_eq!(
        fs::read_to_string(dir.path().join("tag.txt")).unwrap(),
        "ComputerCheckIn"
    );
}
