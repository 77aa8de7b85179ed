use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{ArgAction, Parser};
use serde_json::Value;
use signal_core::{Args, HandlerError, Receiver, Signal};
use tokio::time::{Duration, sleep};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Build a signal, connect receivers, freeze it and send once.
#[derive(Debug, Parser)]
#[command(name = "signal-cli", about = "Freezable async signal demo")]
struct Cli {
    /// Owner label shown in the signal's debug output
    #[arg(long, default_value = "demo")]
    owner: String,

    /// Number of receivers to connect
    #[arg(short = 'n', long, default_value_t = 3)]
    receivers: usize,

    /// 1-based index of a receiver that fails
    #[arg(long, value_name = "INDEX")]
    fail_at: Option<usize>,

    /// Send without freezing first
    #[arg(long)]
    skip_freeze: bool,

    /// Positional argument (JSON, plain text falls back to a string; repeatable)
    #[arg(long = "arg", value_name = "JSON", value_parser = parse_json)]
    args: Vec<Value>,

    /// Keyword argument KEY=JSON (repeatable)
    #[arg(long = "kwarg", value_name = "KEY=JSON", value_parser = parse_kwarg)]
    kwargs: Vec<(String, Value)>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn parse_json(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

fn parse_kwarg(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=JSON, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), parse_json(value)?))
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("signal_cli={level}").parse()?)
        .add_directive(format!("signal_core={level}").parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

/// 受け取った引数をログに出すだけの receiver
struct EchoReceiver {
    label: String,
    fail: bool,
    calls: AtomicU32,
}

impl EchoReceiver {
    fn new(index: usize, fail: bool) -> Self {
        Self {
            label: format!("echo-{index}"),
            fail,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Receiver<Args> for EchoReceiver {
    async fn receive(&self, args: &Args) -> Result<(), HandlerError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        // 非同期処理のつもり
        sleep(Duration::from_millis(10)).await;

        if self.fail {
            return Err(HandlerError::failed(format!("{} refused the signal", self.label)));
        }
        info!(
            receiver = %self.label,
            positional = ?args.positional(),
            keywords = ?args.keywords(),
            "received"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // (A) owner が signal を作る
    let mut signal: Signal<Args> = Signal::new(&cli.owner);

    // (B) receiver を登録順に接続
    let mut echoes = Vec::with_capacity(cli.receivers);
    for index in 1..=cli.receivers {
        let echo = Arc::new(EchoReceiver::new(index, cli.fail_at == Some(index)));
        signal
            .connect(echo.clone())
            .context("connecting receiver")?;
        echoes.push(echo);
    }

    // (C) freeze（--skip-freeze なら NotFrozen を見せる）
    if !cli.skip_freeze {
        signal.freeze();
    }
    info!(signal = ?signal, "signal ready");

    // (D) 引数を組み立てて送信
    let mut args = Args::new();
    for value in cli.args {
        args = args.arg(value);
    }
    for (key, value) in cli.kwargs {
        args = args.kwarg(key, value);
    }

    let result = signal.send(&args).await;

    // (E) どの receiver が呼ばれたかを表示
    for echo in &echoes {
        info!(
            receiver = %echo.label,
            calls = echo.calls.load(Ordering::Relaxed),
            "summary"
        );
    }

    result.context("sending signal")
}
