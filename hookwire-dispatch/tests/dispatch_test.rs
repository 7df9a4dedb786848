//! End-to-end dispatch tests

use hookwire_dispatch::*;
use hookwire_events::{Event, EventTag, FixtureStore, ParseError};
use std::sync::{Arc, Mutex};

fn recorder(name: &'static str, seen: &Arc<Mutex<Vec<String>>>) -> impl EventHandler + 'static {
    let seen = seen.clone();
    handler_fn(name, move |event: &Event| {
        seen.lock().unwrap().push(format!("{}:{}", name, event.tag()));
        Ok(())
    })
}

#[tokio::test]
async fn test_every_fixture_dispatches() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut builder = WebhookReceiver::builder();
    for tag in EventTag::ALL {
        builder = builder.register(tag, recorder("all", &seen));
    }
    let receiver = builder.build();

    let fixtures = FixtureStore::embedded();
    for (tag, raw) in fixtures.iter() {
        let report = receiver.receive(tag, raw).await.unwrap();
        assert_eq!(report.status, DispatchStatus::AllSucceeded, "{}", tag);
    }

    assert_eq!(seen.lock().unwrap().len(), EventTag::ALL.len());
}

#[tokio::test]
async fn test_failure_does_not_stop_later_handlers() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let receiver = WebhookReceiver::builder()
        .register(EventTag::ComputerPolicyFinished, recorder("a", &seen))
        .register(
            EventTag::ComputerPolicyFinished,
            handler_fn("b", |event: &Event| {
                if event.field_bool("successful") == Some(true) {
                    Err(HandlerError::failed("unexpected success"))
                } else {
                    Ok(())
                }
            }),
        )
        .register(EventTag::ComputerPolicyFinished, recorder("c", &seen))
        .build();

    let raw = FixtureStore::embedded();
    let raw = raw.get(EventTag::ComputerPolicyFinished).unwrap();
    let report = receiver
        .receive(EventTag::ComputerPolicyFinished, raw)
        .await
        .unwrap();

    assert_eq!(report.status, DispatchStatus::PartialFailure);
    assert_eq!(report.invoked, 3);
    assert_eq!(report.errors().next().unwrap().handler, "b");
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["a:ComputerPolicyFinished", "c:ComputerPolicyFinished"]
    );
}

#[tokio::test]
async fn test_invalid_payload_is_rejected_before_dispatch() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let receiver = WebhookReceiver::builder()
        .register(EventTag::PushSent, recorder("push", &seen))
        .build();

    let err = receiver
        .receive(EventTag::PushSent, "not json")
        .await
        .unwrap_err();

    assert!(matches!(err, ParseError::MalformedPayload(_)));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_report_serializes() {
    let receiver = WebhookReceiver::builder().build();
    let raw = FixtureStore::embedded();
    let report = receiver
        .receive(EventTag::JssShutdown, raw.get(EventTag::JssShutdown).unwrap())
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "no_handlers");
    assert_eq!(json["tag"], "JSSShutdown");
    assert_eq!(json["invoked"], 0);
}

#[cfg(unix)]
mod directory {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(path: &Path, body: &str) {
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn test_directory_handlers_receive_payload() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");

        write_script(
            &dir.path().join("ComputerAdded-capture.sh"),
            &format!("cat > {}", out.display()),
        );
        write_script(&dir.path().join("ComputerAdded-fail.sh"), "echo nope >&2; exit 3");
        fs::write(dir.path().join("notes.txt"), "not a handler").unwrap();

        let builder = WebhookReceiver::builder().load_handlers(&DirectorySource::new(dir.path()));
        assert_eq!(builder.load_errors().len(), 1);
        let receiver = builder.build();

        let fixtures = FixtureStore::embedded();
        let raw = fixtures.get(EventTag::ComputerAdded).unwrap();
        let report = receiver.receive(EventTag::ComputerAdded, raw).await.unwrap();

        assert_eq!(report.status, DispatchStatus::PartialFailure);
        assert!(report.outcome("ComputerAdded-capture.sh").unwrap().is_success());

        let failure = report.outcome("ComputerAdded-fail.sh").unwrap().error().unwrap();
        assert!(matches!(
            &failure.cause,
            HandlerError::CommandFailed { stderr, .. } if stderr == "nope"
        ));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, serde_json::from_str::<serde_json::Value>(raw).unwrap());
    }

    #[tokio::test]
    async fn test_manifest_handler_with_env() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("id.txt");

        fs::write(
            dir.path().join("announce.toml"),
            format!(
                r#"
events = ["JSSStartup", "JSSShutdown"]
command = "/bin/sh"
args = ["-c", "printf '%s' \"$SITE\" > {}"]
env = {{ SITE = "hq" }}
"#,
                out.display()
            ),
        )
        .unwrap();

        let receiver = WebhookReceiver::builder()
            .load_handlers(&DirectorySource::new(dir.path()))
            .build();
        assert_eq!(receiver.dispatcher().registry().len(), 2);

        let fixtures = FixtureStore::embedded();
        let report = receiver
            .receive(EventTag::JssStartup, fixtures.get(EventTag::JssStartup).unwrap())
            .await
            .unwrap();

        assert_eq!(report.status, DispatchStatus::AllSucceeded);
        assert_eq!(report.outcomes[0].handler, "announce");
        assert_eq!(fs::read_to_string(&out).unwrap(), "hq");
    }
}
