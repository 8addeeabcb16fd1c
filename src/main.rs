//! webtty demo - a line REPL driving a session from the console
//!
//! Lines read from stdin are submitted to a [`Terminal`]; whatever the
//! commands write is printed back with its escape codes intact, so colors
//! show up in any ANSI-capable terminal.

use std::env;
use std::io::Write as _;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use webtty::{
    Command, CommandIo, CommandTable, Config, ConfigLoader, DisplayKind, Renderer, Setting,
    SettingValue, Settings, Terminal,
};

#[derive(Parser, Debug)]
#[command(name = "webtty", version, about = "Line-oriented command shell demo")]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Write the default configuration to the user config directory and exit
    #[arg(long)]
    init_config: bool,
}

/// Renderer writing straight to the console
#[derive(Default)]
struct ConsoleRenderer {
    prompt: Mutex<String>,
}

impl ConsoleRenderer {
    fn prompt(&self) -> String {
        self.prompt
            .lock()
            .map(|prompt| prompt.clone())
            .unwrap_or_default()
    }
}

impl Renderer for ConsoleRenderer {
    fn attach(&self, session_id: &str) {
        debug!("Attached to session {}", session_id);
    }

    fn detach(&self) {
        debug!("Detached from session");
    }

    fn display(&self, text: &str, kind: DisplayKind) {
        // The console already shows what was typed
        if kind == DisplayKind::Command {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            warn!("Failed to write to console: {}", e);
        }
    }

    // The REPL only reads the next line once `submit` returns
    fn set_input_enabled(&self, _enabled: bool) {}

    fn focus_input(&self) {}

    fn apply_settings(&self, settings: &Settings) {
        if let Ok(mut prompt) = self.prompt.lock() {
            *prompt = settings.prompt.clone().unwrap_or_default();
        }
        if let Some(title) = &settings.title {
            print!("\x1b]0;{}\x07", title);
        }
    }
}

/// `sleep SECONDS` - the one asynchronous demo command
struct Sleep;

#[async_trait]
impl Command for Sleep {
    async fn run(&self, io: &CommandIo, argv: &[String]) -> anyhow::Result<i32> {
        let Some(raw) = argv.first() else {
            io.eprintln("usage: sleep SECONDS")?;
            return Ok(2);
        };
        let seconds: f64 = raw
            .parse()
            .with_context(|| format!("invalid duration '{}'", raw))?;
        if !seconds.is_finite() || seconds < 0.0 {
            bail!("invalid duration '{}'", raw);
        }
        tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
        Ok(0)
    }
}

/// `read` - awaits the session's input stream and echoes what arrived
struct Read;

#[async_trait]
impl Command for Read {
    async fn run(&self, io: &CommandIo, _argv: &[String]) -> anyhow::Result<i32> {
        let input = io.stdin.read().await;
        io.println(&format!("read {} characters", input.chars().count()))?;
        Ok(0)
    }
}

fn demo_commands() -> CommandTable {
    let mut table = CommandTable::new()
        .with_fn("echo", |io, argv| {
            io.println(&argv.join(" "))?;
            Ok(0)
        })
        .with_fn("true", |_, _| Ok(0))
        .with_fn("false", |_, _| Ok(1))
        .with_fn("colors", |io, _| {
            for code in (30..=37).chain(40..=47) {
                io.stdout.write(&format!("\x1b[{}m {} \x1b[0m", code, code))?;
            }
            io.println("")?;
            Ok(0)
        })
        .with_fn("fail", |_, argv| {
            let reason = if argv.is_empty() {
                "something broke".to_string()
            } else {
                argv.join(" ")
            };
            Err(anyhow::anyhow!(reason)).context("fail command gave up")
        })
        .with("sleep", Arc::new(Sleep))
        .with("read", Arc::new(Read));

    let mut names = table.names();
    names.push("help".to_string());
    names.sort();
    table.register_fn("help", move |io, _| {
        io.println(&format!("commands: {}", names.join(" ")))?;
        io.println("settings: :set NAME VALUE, :get NAME")?;
        Ok(0)
    });
    table
}

/// Handle `:set` / `:get` lines, which talk to the session rather than a command
fn handle_meta(terminal: &Terminal, line: &str) -> webtty::Result<()> {
    let tokens = webtty::terminal::tokenize(line);
    match tokens.as_slice() {
        [cmd, name, value] if cmd == ":set" => {
            let setting = Setting::from_str(name)?;
            terminal.set(setting, SettingValue::parse_for(setting, value)?)
        }
        [cmd, name] if cmd == ":get" => {
            let setting = Setting::from_str(name)?;
            match terminal.get(setting) {
                Some(value) => println!("{} = {}", setting, value),
                None => println!("{} is unset", setting),
            }
            Ok(())
        }
        _ => Err(webtty::Error::Other(format!("unrecognized: {}", line))),
    }
}

fn init_logging(args: &Args, config: &Config) {
    let debug = args.debug
        || env::var("WEBTTY_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let log_level = if debug { "debug" } else { config.log_level.as_str() };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn load_configuration(args: &Args) -> webtty::Result<Config> {
    match &args.config {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.init_config {
        let path = ConfigLoader::default_config_path();
        match ConfigLoader::save_to_path(&webtty::default_config(), &path) {
            Ok(()) => println!("Wrote default configuration to {}", path.display()),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    let config = match load_configuration(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", webtty::handle_startup_error(&e));
            process::exit(1);
        }
    };
    init_logging(&args, &config);
    info!("Starting {} v{}", webtty::NAME, webtty::VERSION);

    let terminal = Terminal::with_config(demo_commands(), &config);
    let renderer = Arc::new(ConsoleRenderer::default());
    terminal.render(renderer.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", renderer.prompt());
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush prompt: {}", e);
        }

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        match line {
            Ok(Some(line)) if line.trim_start().starts_with(':') => {
                if let Err(e) = handle_meta(&terminal, line.trim()) {
                    eprintln!("{}", e);
                }
            }
            Ok(Some(line)) => {
                let outcome = terminal.submit(&line).await;
                debug!("Submit outcome: {:?}", outcome);
                // Exit codes and failure reports end without a newline
                if outcome.ran() && outcome != webtty::SubmitOutcome::Completed(0) {
                    println!();
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    terminal.teardown();
    info!("Session {} closed", terminal.id());
}
