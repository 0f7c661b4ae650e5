use chrono::Utc;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use timeflow_core::{Command, Config, Event, QuickStart, TickCadence, Ticker, Timer};

use super::open_engine;

#[derive(Args)]
pub struct RunArgs {
    /// Exit once no timer is running
    #[arg(long)]
    until_idle: bool,
}

/// What the loop should do after a stdin line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(args))
}

async fn serve(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = open_engine(&config)?;
    let ticker = Ticker::start(engine, TickCadence::from_config(&config.ticker));
    let mut events = ticker.subscribe();

    let timers = ticker.snapshot().await?;
    let idle_at_start = !timers.iter().any(Timer::is_running);
    print_line(&Event::Snapshot { timers, at: Utc::now() })?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    if args.until_idle && idle_at_start {
        info!("nothing running; exiting");
    } else {
        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("interrupted");
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) => {
                        print_line(&event)?;
                        if args.until_idle && matches!(event, Event::Ticked { running: 0, .. }) {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "event output fell behind"),
                    Err(RecvError::Closed) => break,
                },
                line = lines.next_line(), if stdin_open => match line? {
                    Some(line) => {
                        if handle_line(&ticker, &mut events, line.trim()).await? == Flow::Quit {
                            break;
                        }
                        if args.until_idle && is_idle(&ticker).await? {
                            break;
                        }
                    }
                    // With --until-idle, a closed stdin just means no more commands.
                    None if args.until_idle => stdin_open = false,
                    None => break,
                },
            }
        }
    }

    // Flush events already produced before the task ends.
    while let Ok(event) = events.try_recv() {
        print_line(&event)?;
    }
    ticker.stop().await?;
    Ok(())
}

async fn handle_line(
    ticker: &Ticker,
    events: &mut broadcast::Receiver<Event>,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let mut parts = line.split_whitespace();
    let (Some(verb), arg) = (parts.next(), parts.next()) else {
        return Ok(Flow::Continue);
    };

    let command = match (verb, arg) {
        ("quit" | "exit", _) => return Ok(Flow::Quit),
        ("list", _) => {
            let timers = ticker.snapshot().await?;
            // Everything the ticker did before the snapshot prints first.
            while let Ok(event) = events.try_recv() {
                print_line(&event)?;
            }
            print_line(&Event::Snapshot { timers, at: Utc::now() })?;
            return Ok(Flow::Continue);
        }
        ("toggle", Some(id)) => Command::Toggle(id.to_string()),
        ("reset", Some(id)) => Command::Reset(id.to_string()),
        ("delete", Some(id)) => Command::Delete(id.to_string()),
        ("clear", _) => Command::ClearCompleted,
        ("quick", Some(preset)) => match preset.parse::<QuickStart>() {
            Ok(preset) => Command::Add(preset.timer()),
            Err(e) => {
                eprintln!("{e}");
                return Ok(Flow::Continue);
            }
        },
        _ => {
            eprintln!(
                "unknown command '{line}' (list, toggle ID, reset ID, delete ID, clear, quick PRESET, quit)"
            );
            return Ok(Flow::Continue);
        }
    };
    ticker.send(command).await?;
    Ok(Flow::Continue)
}

async fn is_idle(ticker: &Ticker) -> Result<bool, Box<dyn std::error::Error>> {
    let timers = ticker.snapshot().await?;
    Ok(!timers.iter().any(Timer::is_running))
}

/// One compact JSON object per line.
fn print_line(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
