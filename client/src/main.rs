use clap::Parser;
use client::input::{Command, HELP};
use client::network::{ClientError, GameClient};
use client::rendering::{render_outcome, render_summaries, render_view};
use log::info;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// How long to wait for each reply, in milliseconds
    #[arg(short = 't', long, default_value = "10000")]
    timeout_ms: u64,

    /// Number of search results to ask for
    #[arg(short = 'l', long)]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    let mut client = GameClient::new(&args.server, Duration::from_millis(args.timeout_ms)).await?;
    let mut max_guesses = None;

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(client::input::ParseError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let result = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                Ok(())
            }
            Command::Start => start(&mut client, &mut max_guesses).await,
            Command::Resume(session_id) => {
                client.resume(session_id);
                show_state(&mut client, &mut max_guesses).await
            }
            Command::Search(query) => client
                .search(&query, args.limit)
                .await
                .map(|players| println!("{}", render_summaries(&players))),
            Command::Guess(id) => client
                .guess(id)
                .await
                .map(|outcome| println!("{}", render_outcome(&outcome, max_guesses))),
            Command::State => show_state(&mut client, &mut max_guesses).await,
            Command::Ping => client
                .ping()
                .await
                .map(|rtt| println!("Round trip: {} ms", rtt.as_millis())),
        };

        if let Err(e) = result {
            println!("Error: {}", e);
        }
    }

    Ok(())
}

async fn start(
    client: &mut GameClient,
    max_guesses: &mut Option<u32>,
) -> Result<(), ClientError> {
    let session_id = client.start_game().await?;
    println!("New game {}. Search for a player, then guess by id.", session_id);

    let view = client.session_state().await?;
    *max_guesses = Some(view.max_guesses);
    println!("You have {} guesses.", view.max_guesses);
    Ok(())
}

async fn show_state(
    client: &mut GameClient,
    max_guesses: &mut Option<u32>,
) -> Result<(), ClientError> {
    let view = client.session_state().await?;
    *max_guesses = Some(view.max_guesses);
    println!("{}", render_view(&view));
    Ok(())
}
