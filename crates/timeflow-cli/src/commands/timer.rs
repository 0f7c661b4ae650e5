use clap::Subcommand;
use timeflow_core::{
    format_clock, Config, DurationInput, Event, Mood, QuickStart, Timer, TimerColor, TimerKind,
    TimerStore,
};

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Add a running countdown
    Add {
        /// Timer title
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        hours: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        minutes: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        seconds: i64,
        /// Accent color (blue, indigo, purple, pink, rose, orange, emerald, cyan)
        #[arg(long)]
        color: Option<TimerColor>,
        /// Mood tag (focus, energy, creative, learning, relax, routine, tired, anxious)
        #[arg(long)]
        mood: Option<Mood>,
    },
    /// Add a running stopwatch
    Stopwatch {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        color: Option<TimerColor>,
        #[arg(long)]
        mood: Option<Mood>,
    },
    /// Add a preset countdown (break, reading, pomodoro, deep-work)
    Quick { preset: QuickStart },
    /// Start or pause a timer
    Toggle {
        /// Timer ID or unique prefix
        id: String,
    },
    /// Reset a timer to its starting value
    Reset {
        /// Timer ID or unique prefix
        id: String,
    },
    /// Delete a timer
    Delete {
        /// Timer ID or unique prefix
        id: String,
    },
    /// Remove every completed timer
    ClearCompleted,
    /// List timers, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Advance running timers by one second per tick
    Tick {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut engine = open_engine(&config)?;

    match action {
        TimerAction::Add {
            title,
            hours,
            minutes,
            seconds,
            color,
            mood,
        } => {
            let total = DurationInput::new(hours, minutes, seconds).total_seconds();
            let timer = Timer::countdown(
                title.unwrap_or_default(),
                total,
                color.unwrap_or(config.defaults.color),
                mood.unwrap_or(config.defaults.mood),
            );
            print_json(&engine.store_mut().add(timer))?;
        }
        TimerAction::Stopwatch { title, color, mood } => {
            let timer = Timer::stopwatch(
                title.unwrap_or_default(),
                color.unwrap_or(config.defaults.color),
                mood.unwrap_or(config.defaults.mood),
            );
            print_json(&engine.store_mut().add(timer))?;
        }
        TimerAction::Quick { preset } => {
            print_json(&engine.store_mut().add(preset.timer()))?;
        }
        TimerAction::Toggle { id } => {
            mutate(engine.store_mut(), &id, TimerStore::toggle_by_id)?;
        }
        TimerAction::Reset { id } => {
            mutate(engine.store_mut(), &id, TimerStore::reset_by_id)?;
        }
        TimerAction::Delete { id } => {
            mutate(engine.store_mut(), &id, TimerStore::delete_by_id)?;
        }
        TimerAction::ClearCompleted => match engine.store_mut().clear_completed() {
            Some(event) => print_json(&event)?,
            None => eprintln!("no completed timers"),
        },
        TimerAction::List { json } => {
            let timers = engine.store().timers();
            if json {
                print_json(&timers)?;
            } else if timers.is_empty() {
                println!("No timers.");
            } else {
                print_table(timers);
            }
        }
        TimerAction::Tick { count } => {
            let mut events: Vec<Event> = Vec::new();
            for _ in 0..count {
                events.extend(engine.tick().events());
            }
            print_json(&events)?;
        }
    }
    Ok(())
}

fn mutate(
    store: &mut TimerStore,
    id: &str,
    op: fn(&mut TimerStore, &str) -> Option<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(resolved) = store.resolve_id(id).map(str::to_string) else {
        eprintln!("no timer matches '{id}'");
        return Ok(());
    };
    match op(store, &resolved) {
        Some(event) => print_json(&event)?,
        None => eprintln!("timer {resolved} unchanged"),
    }
    Ok(())
}

fn print_table(timers: &[Timer]) {
    println!(
        "{:<8}  {:<9}  {:<11}  {:>8}  {:>4}  {}",
        "ID", "TYPE", "STATUS", "TIME", "DONE", "TITLE"
    );
    for t in timers {
        let kind = match t.kind {
            TimerKind::Countdown => "countdown",
            TimerKind::Stopwatch => "stopwatch",
        };
        let short_id: String = t.id.chars().take(8).collect();
        println!(
            "{:<8}  {:<9}  {:<11}  {:>8}  {:>3}%  {} [{} / {}]",
            short_id,
            kind,
            t.status.label(),
            format_clock(t.remaining_time),
            (t.progress() * 100.0).round() as u32,
            t.title,
            t.color,
            t.mood.label(),
        );
    }
}
