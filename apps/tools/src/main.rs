use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::EventId;
use storage::{RsvpStore, Storage};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://rsvps.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print stored responses and totals for an event, newest first.
    List { event_id: String },
    /// Insert a rehearsal response directly into the store.
    Seed {
        event_id: String,
        name: String,
        #[arg(default_value_t = 1)]
        guests: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::List { event_id } => {
            let rows = storage
                .list_rsvps_for_event(&EventId::new(event_id))
                .await?;
            for (index, row) in rows.iter().enumerate() {
                println!(
                    "#{} {} — {} guests at {}",
                    index + 1,
                    row.name,
                    row.guest_count.unwrap_or(0),
                    row.submitted_at,
                );
            }
            let total_guests: i64 = rows.iter().filter_map(|row| row.guest_count).sum();
            println!("{} responses, {total_guests} guests", rows.len());
        }
        Command::Seed {
            event_id,
            name,
            guests,
        } => {
            let stored = storage
                .insert_rsvp(&EventId::new(event_id), name.trim(), guests.clamp(1, 10))
                .await?;
            println!("seeded rsvp id={}", stored.rsvp_id.0);
        }
    }

    Ok(())
}
