use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client_core::{countdown, GuestList, HttpBackend, RsvpComposer};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8443")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one RSVP response.
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },
    /// Print every response for the event, newest first, with totals.
    List,
    /// Show time remaining until the event date (RFC 3339).
    Countdown { date: DateTime<Utc> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();
    let backend = Arc::new(HttpBackend::new(cli.server_url));

    match cli.command {
        Command::Submit { name, guests } => {
            let composer = RsvpComposer::new(backend);
            composer.set_name(name).await;
            // The stepper clamps into [1, 10] the same way the form does.
            for _ in 1..guests {
                composer.increment_guests().await;
            }
            let stored = composer.submit().await?;
            println!(
                "recorded rsvp #{} for {} ({} attending)",
                stored.rsvp_id.0,
                stored.name,
                stored.guest_count.unwrap_or(0)
            );
        }
        Command::List => {
            let list = GuestList::new(backend);
            let snapshot = list.refresh().await?;
            if snapshot.responses.is_empty() {
                println!("no responses yet");
            } else {
                for (ordinal, entry) in snapshot.numbered() {
                    let guests = entry.guest_count.unwrap_or(0);
                    println!(
                        "#{ordinal} {} — {} guest{} ({})",
                        entry.name,
                        guests,
                        if guests == 1 { "" } else { "s" },
                        entry.submitted_at.format("%Y-%m-%d %H:%M"),
                    );
                }
                println!(
                    "{} responses, {} guests",
                    snapshot.tally.total_responses, snapshot.tally.total_guests
                );
            }
        }
        Command::Countdown { date } => match countdown::time_until(date, Utc::now()) {
            Some(left) => println!(
                "{}d {}h {}m {}s until the celebration",
                left.days, left.hours, left.minutes, left.seconds
            ),
            None => println!("the big day has arrived"),
        },
    }

    Ok(())
}
