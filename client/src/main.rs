use clap::{Parser, Subcommand};
use kaimono_client::{ClientError, HttpItemsApi, ListView};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kaimono", version, about = "Shopping list client")]
struct Cli {
    /// Base URL of the API, including the stage path.
    #[arg(long, env = "KAIMONO_API_URL")]
    api_url: String,

    #[arg(long, env = "KAIMONO_LIST_ID", default_value = "default-list")]
    list_id: String,

    /// Caller identity forwarded to the API.
    #[arg(long, env = "KAIMONO_USER_ID")]
    user_id: Option<String>,

    #[arg(long, env = "KAIMONO_IDENTITY_HEADER", default_value = "x-user-id")]
    identity_header: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the list.
    Show,
    /// Add an item.
    Add { text: String },
    /// Flip an item between done and not done.
    Toggle { item_id: String },
    /// Delete an item.
    Delete { item_id: String },
    /// Print the list, refreshing it on a fixed interval.
    Watch {
        /// Seconds between refreshes.
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, ClientError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut api = HttpItemsApi::new(&cli.api_url, cli.list_id)?;
    if let Some(user_id) = cli.user_id {
        api = api.with_identity(cli.identity_header, user_id);
    }
    let mut view = ListView::new(api);

    let ok = match cli.command {
        Command::Show => view.refresh().await,
        Command::Add { text } => view.add(&text).await,
        Command::Toggle { item_id } => view.refresh().await && view.toggle(&item_id).await,
        Command::Delete { item_id } => view.delete(&item_id).await,
        Command::Watch { interval } => {
            watch(&mut view, Duration::from_secs(interval.max(1))).await;
            return Ok(ExitCode::SUCCESS);
        }
    };

    print!("{}", view.render());
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn watch(view: &mut ListView<HttpItemsApi>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if view.refresh().await {
                    println!("--- {} ---", view.api().list_id());
                    print!("{}", view.render());
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
}
