#![cfg(unix)]

mod common;

use common::{RecordingSink, STUBBORN_SERVER, registry, shell_server};
use mockall::mock;
use mockall::predicate::*;
use server_runner::command::{Command, CommandDispatcher, Outcome, builtin_commands};
use server_runner::config::{ServerConfig, ServerRegistry};
use server_runner::error::{Error, Result};
use server_runner::output::{Emphasis, OutputSink};
use server_runner::server::LifecycleController;
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Registry {}

    impl ServerRegistry for Registry {
        fn server_names(&self) -> Vec<String>;
        fn resolve_config(&self, name: &str) -> Result<ServerConfig>;
    }
}

fn dispatcher(servers: Arc<dyn ServerRegistry>) -> (CommandDispatcher, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let output: Arc<dyn OutputSink> = sink.clone();
    let controller = Arc::new(LifecycleController::new(
        Arc::clone(&servers),
        Arc::clone(&output),
    ));
    let dispatcher = CommandDispatcher::new(builtin_commands().unwrap(), controller, servers, output);
    (dispatcher, sink)
}

fn command(tokens: &[&str]) -> Command {
    Command::from_tokens(tokens.iter().copied()).unwrap()
}

#[tokio::test]
async fn test_unknown_command_is_reported_not_fatal() {
    let (dispatcher, sink) = dispatcher(Arc::new(registry(vec![])));

    let outcome = dispatcher.execute(&command(&["launch", "--server", "alpha"])).await;

    assert!(matches!(outcome, Outcome::NotFound));
    assert_eq!(
        sink.messages(),
        vec![(
            "Command 'launch' not found. Use 'help' for a list of possible commands.".to_string(),
            Emphasis::Warning
        )]
    );
}

#[tokio::test]
async fn test_help_lists_every_command_once() {
    let (dispatcher, sink) = dispatcher(Arc::new(registry(vec![])));

    let outcome = dispatcher.execute(&command(&["HELP"])).await;
    assert!(outcome.is_completed());

    let lines = sink.lines();
    for spec in dispatcher.commands().list_all() {
        let entry = format!("- {:<15}| {}", spec.name(), spec.description());
        assert_eq!(
            lines.iter().filter(|line| **line == entry).count(),
            1,
            "help should list '{}' exactly once",
            spec.name()
        );
        assert!(!spec.usage().is_empty());
        assert!(lines.contains(&format!("> Usage: {}", spec.usage())));
    }

    let entries = lines.iter().filter(|line| line.starts_with("- ")).count();
    assert_eq!(entries, 7);
}

#[tokio::test]
async fn test_missing_server_reports_usage() {
    let (dispatcher, sink) = dispatcher(Arc::new(registry(vec![])));

    let outcome = dispatcher.execute(&command(&["start"])).await;

    assert!(matches!(
        outcome,
        Outcome::Failed(Error::MissingParameter(ref field)) if field == "server"
    ));
    assert_eq!(
        sink.messages(),
        vec![(
            "Missing required parameter '--server'. Usage: start --server <name>".to_string(),
            Emphasis::Error
        )]
    );
}

#[tokio::test]
async fn test_send_message_writes_joined_text_once() {
    let (dispatcher, sink) =
        dispatcher(Arc::new(registry(vec![("foo", shell_server(STUBBORN_SERVER))])));

    assert!(dispatcher
        .execute(&command(&["start", "--server", "foo"]))
        .await
        .is_completed());

    let outcome = dispatcher
        .execute(&command(&[
            "send-message",
            "--server",
            "foo",
            "--message",
            "hello",
            "world",
        ]))
        .await;
    assert!(outcome.is_completed());
    assert!(sink.lines().contains(&"Sent message to 'foo': hello world".to_string()));

    assert!(
        sink.wait_for_line("[foo] hello world", Duration::from_secs(5))
            .await
    );
    // Give any stray second write a chance to show up.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let echoed: Vec<String> = sink
        .lines()
        .into_iter()
        .filter(|line| line.starts_with("[foo] "))
        .collect();
    assert_eq!(echoed, vec!["[foo] hello world".to_string()]);

    assert!(dispatcher
        .execute(&command(&["force-stop", "--server", "foo"]))
        .await
        .is_completed());
}

#[tokio::test]
async fn test_send_message_requires_message_body() {
    let (dispatcher, sink) =
        dispatcher(Arc::new(registry(vec![("foo", shell_server(STUBBORN_SERVER))])));

    let outcome = dispatcher
        .execute(&command(&["send-message", "--server", "foo", "--message"]))
        .await;

    assert!(matches!(
        outcome,
        Outcome::Failed(Error::MissingParameter(ref field)) if field == "message"
    ));
    assert_eq!(
        sink.with_emphasis(Emphasis::Error),
        vec![
            "Missing required parameter '--message'. Usage: send-message --server <name> --message <text...>"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_server_list_reports_status_in_order() {
    let (dispatcher, sink) = dispatcher(Arc::new(registry(vec![
        ("alpha", shell_server(STUBBORN_SERVER)),
        ("beta", shell_server(STUBBORN_SERVER)),
    ])));

    dispatcher
        .execute(&command(&["start", "--server", "alpha"]))
        .await;
    sink.clear();

    let outcome = dispatcher.execute(&command(&["server-list"])).await;
    assert!(outcome.is_completed());

    let status: Vec<(String, Emphasis)> = sink
        .messages()
        .into_iter()
        .filter(|(line, _)| line.starts_with("> "))
        .collect();
    assert_eq!(
        status,
        vec![
            ("> alpha | Online".to_string(), Emphasis::Success),
            ("> beta | Offline".to_string(), Emphasis::Muted),
        ]
    );

    dispatcher
        .execute(&command(&["Force_Stop", "--server", "alpha"]))
        .await;
    assert!(sink.lines().contains(&"Killed server 'alpha'.".to_string()));
}

#[tokio::test]
async fn test_not_running_failures_produce_one_message() {
    let (dispatcher, sink) =
        dispatcher(Arc::new(registry(vec![("beta", shell_server(STUBBORN_SERVER))])));

    for name in ["stop", "force-stop", "restart"] {
        sink.clear();
        let outcome = dispatcher
            .execute(&command(&[name, "--server", "beta"]))
            .await;

        assert!(matches!(outcome, Outcome::Failed(Error::NotRunning(_))));
        assert_eq!(
            sink.messages(),
            vec![(
                "Server 'beta' is not running".to_string(),
                Emphasis::Error
            )],
            "{} should report exactly one message",
            name
        );
    }

    assert!(!dispatcher.controller().is_running("beta").await);
}

#[tokio::test]
async fn test_start_twice_reports_already_running() {
    let (dispatcher, sink) =
        dispatcher(Arc::new(registry(vec![("alpha", shell_server(STUBBORN_SERVER))])));

    dispatcher
        .execute(&command(&["start", "--server", "alpha"]))
        .await;
    let outcome = dispatcher
        .execute(&command(&["start", "--server", "alpha"]))
        .await;

    assert!(matches!(outcome, Outcome::Failed(Error::AlreadyRunning(_))));
    assert_eq!(
        sink.with_emphasis(Emphasis::Error),
        vec!["Server 'alpha' is already running".to_string()]
    );

    dispatcher
        .execute(&command(&["force-stop", "--server", "alpha"]))
        .await;
}

#[tokio::test]
async fn test_unregistered_server_is_reported() {
    let mut servers = MockRegistry::new();
    servers
        .expect_resolve_config()
        .with(eq("ghost"))
        .times(1)
        .returning(|name| Err(Error::ServerNotRegistered(name.to_string())));

    let (dispatcher, sink) = dispatcher(Arc::new(servers));
    let outcome = dispatcher
        .execute(&command(&["start", "--server", "ghost"]))
        .await;

    assert!(matches!(outcome, Outcome::Failed(Error::ServerNotRegistered(_))));
    assert_eq!(
        sink.with_emphasis(Emphasis::Error),
        vec!["Server 'ghost' is not registered".to_string()]
    );
    assert!(!dispatcher.controller().is_running("ghost").await);
}

#[tokio::test]
async fn test_server_list_reads_registry_names() {
    let mut servers = MockRegistry::new();
    servers
        .expect_server_names()
        .times(1)
        .returning(|| vec!["lobby".to_string(), "survival".to_string()]);

    let (dispatcher, sink) = dispatcher(Arc::new(servers));
    dispatcher.execute(&command(&["server list"])).await;

    assert_eq!(
        sink.lines(),
        vec![
            "Servers:".to_string(),
            "> lobby | Offline".to_string(),
            "> survival | Offline".to_string(),
        ]
    );
}
