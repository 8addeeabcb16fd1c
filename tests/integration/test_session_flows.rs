//! Integration Tests for Session Flows
//!
//! Drive a full session through a headless renderer: echo, dispatch,
//! output ordering, input locking and settings.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;
use webtty::terminal::{KeyCode, KeyEvent, Writable};
use webtty::{
    Command, CommandIo, CommandTable, Config, DisplayKind, MarkupRenderer, Setting, SettingValue,
    SubmitOutcome, Terminal,
};

/// Blocks until released, so a test can observe the executing state
struct Gate {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl Command for Gate {
    async fn run(&self, io: &CommandIo, _argv: &[String]) -> anyhow::Result<i32> {
        self.started.notify_one();
        self.release.notified().await;
        io.println("released")?;
        Ok(0)
    }
}

/// Writes a line in two pieces with a scheduling turn in between
struct Split;

#[async_trait]
impl Command for Split {
    async fn run(&self, io: &CommandIo, argv: &[String]) -> anyhow::Result<i32> {
        io.stdout.write(&argv[0])?;
        tokio::task::yield_now().await;
        io.stdout.write(&format!("{}\n", argv[1]))?;
        Ok(0)
    }
}

fn base_commands() -> CommandTable {
    CommandTable::new()
        .with_fn("echo", |io, argv| {
            io.println(&argv.join(" "))?;
            Ok(0)
        })
        .with_fn("count", |io, argv| {
            io.println(&argv.len().to_string())?;
            Ok(0)
        })
        .with("split", Arc::new(Split))
}

fn rendered(commands: CommandTable) -> (Arc<Terminal>, Arc<MarkupRenderer>) {
    let terminal = Arc::new(Terminal::new(commands));
    let renderer = Arc::new(MarkupRenderer::new());
    terminal.render(renderer.clone());
    (terminal, renderer)
}

#[tokio::test]
async fn test_echo_then_output() {
    let (terminal, renderer) = rendered(base_commands());
    let outcome = terminal.submit("echo hello world").await;

    assert_eq!(outcome, SubmitOutcome::Completed(0));
    let entries = renderer.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, DisplayKind::Command);
    assert_eq!(entries[1].kind, DisplayKind::Output);
    assert_eq!(entries[1].markup, "hello world<br/>");
}

#[tokio::test]
async fn test_arguments_exclude_command_name() {
    let (terminal, renderer) = rendered(base_commands());
    terminal.submit(r#"count "a b" c"#).await;
    assert_eq!(renderer.output(), vec!["2<br/>"]);
}

#[tokio::test]
async fn test_surrounding_whitespace_trimmed() {
    let (terminal, renderer) = rendered(base_commands());
    terminal.submit("   echo padded   ").await;
    assert_eq!(renderer.entries()[0].markup, "echo padded");
    assert_eq!(terminal.history(), vec!["echo padded"]);
}

#[tokio::test]
async fn test_empty_line_is_a_no_op() {
    let (terminal, renderer) = rendered(base_commands());
    assert_eq!(terminal.submit("").await, SubmitOutcome::Blank);
    assert!(terminal.state().is_idle());
    assert!(renderer.entries().is_empty());
}

#[tokio::test]
async fn test_fragments_across_await_form_one_line() {
    let (terminal, renderer) = rendered(base_commands());
    terminal.submit("split left right").await;
    assert_eq!(renderer.output(), vec!["leftright<br/>"]);
}

#[tokio::test]
async fn test_submit_ignored_while_executing() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let commands = base_commands().with(
        "gate",
        Arc::new(Gate {
            started: started.clone(),
            release: release.clone(),
        }),
    );
    let (terminal, renderer) = rendered(commands);

    let running = {
        let terminal = Arc::clone(&terminal);
        tokio::spawn(async move { terminal.submit("gate").await })
    };
    started.notified().await;

    assert!(terminal.state().is_executing());
    assert!(!renderer.input_enabled());
    assert_eq!(terminal.submit("echo late").await, SubmitOutcome::Ignored);

    release.notify_one();
    assert_eq!(running.await.unwrap(), SubmitOutcome::Completed(0));

    assert!(terminal.state().is_idle());
    assert!(renderer.input_enabled());
    assert_eq!(terminal.history(), vec!["gate"]);
    assert_eq!(renderer.output(), vec!["released<br/>"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_submits_run_and_echo_once() {
    const RACERS: usize = 8;

    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let commands = base_commands().with(
        "gate",
        Arc::new(Gate {
            started: started.clone(),
            release: release.clone(),
        }),
    );
    let (terminal, renderer) = rendered(commands);

    let barrier = Arc::new(tokio::sync::Barrier::new(RACERS));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for _ in 0..RACERS {
        let terminal = Arc::clone(&terminal);
        let barrier = Arc::clone(&barrier);
        let tx = tx.clone();
        tokio::spawn(async move {
            barrier.wait().await;
            let _ = tx.send(terminal.submit("gate").await);
        });
    }

    // The winner holds the session until released, so every other submit is turned away
    started.notified().await;
    for _ in 1..RACERS {
        assert_eq!(rx.recv().await, Some(SubmitOutcome::Ignored));
    }
    release.notify_one();
    assert_eq!(rx.recv().await, Some(SubmitOutcome::Completed(0)));

    assert_eq!(terminal.history(), vec!["gate"]);
    let echoes = renderer
        .entries()
        .iter()
        .filter(|entry| entry.kind == DisplayKind::Command)
        .count();
    assert_eq!(echoes, 1);
}

#[tokio::test]
async fn test_blank_and_unknown_lines_release_the_session() {
    let (terminal, _renderer) = rendered(base_commands());
    assert_eq!(terminal.submit("  ").await, SubmitOutcome::Blank);
    assert!(terminal.state().is_idle());
    assert_eq!(
        terminal.submit("nope").await,
        SubmitOutcome::NotFound("nope".to_string())
    );
    assert!(terminal.state().is_idle());
    assert_eq!(terminal.submit("echo again").await, SubmitOutcome::Completed(0));
}

#[tokio::test]
async fn test_enter_key_submits_and_shift_enter_does_not() {
    let (terminal, renderer) = rendered(base_commands());

    let none = terminal
        .handle_key(KeyEvent::with_shift(KeyCode::Enter), "echo no")
        .await;
    assert!(none.is_none());
    assert!(renderer.entries().is_empty());

    let tab = terminal.handle_key(KeyEvent::new(KeyCode::Tab), "ec").await;
    assert!(tab.is_none());

    let submitted = terminal
        .handle_key(KeyEvent::new(KeyCode::Enter), "echo yes")
        .await;
    assert_eq!(submitted, Some(SubmitOutcome::Completed(0)));
    assert_eq!(renderer.output(), vec!["yes<br/>"]);
}

#[tokio::test]
async fn test_output_after_rerender_goes_to_new_surface() {
    let (terminal, first) = rendered(base_commands());
    let second = Arc::new(MarkupRenderer::new());
    terminal.render(second.clone());

    terminal.submit("echo moved").await;
    assert!(first.entries().is_empty());
    assert_eq!(second.output(), vec!["moved<br/>"]);
}

#[tokio::test]
async fn test_unrendered_session_still_runs() {
    let terminal = Terminal::new(base_commands());
    assert_eq!(
        terminal.submit("echo nobody").await,
        SubmitOutcome::Completed(0)
    );
    terminal.teardown();
}

#[test]
fn test_settings_layering() {
    let mut config = Config::default();
    config.settings.prompt = Some("$ ".to_string());
    let terminal = Terminal::with_config(base_commands(), &config);

    assert_eq!(
        terminal.get(Setting::Prompt),
        Some(SettingValue::Text("$ ".to_string()))
    );
    assert_eq!(
        terminal.get(Setting::FontSize),
        Some(SettingValue::Number(16))
    );
    assert_eq!(terminal.get(Setting::Title), None);

    terminal
        .set(Setting::FontSize, SettingValue::Number(20))
        .unwrap();
    assert_eq!(
        terminal.get(Setting::FontSize),
        Some(SettingValue::Number(20))
    );
    assert!(terminal
        .set(Setting::FontSize, SettingValue::Text("big".to_string()))
        .is_err());
}

#[test]
fn test_render_applies_settings_and_scope() {
    let (terminal, renderer) = rendered(base_commands());
    let applied = renderer.applied_settings().unwrap();
    assert_eq!(applied.background.as_deref(), Some("black"));
    assert!(renderer
        .to_html()
        .starts_with(&format!(r#"<div class="tty {}">"#, terminal.id())));
    assert!(terminal.id().starts_with("tty-"));
}
