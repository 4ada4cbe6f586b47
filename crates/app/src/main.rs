//! Backline Application CLI

use std::process;

use backline_app::{
    database::{self, Db},
    domain::{
        artists::{ArtistsService, PgArtistsService, data::NewArtist, records::ArtistUuid},
        payouts::{PayoutsService, PgPayoutsService},
    },
};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "backline-app", about = "Backline CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Artist(ArtistCommand),
    Payout(PayoutCommand),
}

#[derive(Debug, Args)]
struct ArtistCommand {
    #[command(subcommand)]
    command: ArtistSubcommand,
}

#[derive(Debug, Subcommand)]
enum ArtistSubcommand {
    Create(CreateArtistArgs),
}

#[derive(Debug, Args)]
struct CreateArtistArgs {
    /// Artist display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Optional artist UUID; generated when omitted
    #[arg(long)]
    artist_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct PayoutCommand {
    #[command(subcommand)]
    command: PayoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum PayoutSubcommand {
    /// Show the artist's unsettled balance
    Balance(PayoutArgs),

    /// Settle the artist's unsettled order items into a new cash-out
    Run(PayoutArgs),

    /// List the artist's cash-outs, newest first
    List(PayoutArgs),
}

#[derive(Debug, Args)]
struct PayoutArgs {
    /// Artist UUID
    #[arg(long)]
    artist_uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Artist(ArtistCommand {
            command: ArtistSubcommand::Create(args),
        }) => create_artist(args).await,
        Commands::Payout(PayoutCommand { command }) => match command {
            PayoutSubcommand::Balance(args) => payout_balance(args).await,
            PayoutSubcommand::Run(args) => payout_run(args).await,
            PayoutSubcommand::List(args) => payout_list(args).await,
        },
    }
}

async fn open_db(database_url: &str) -> Result<Db, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(Db::new(pool))
}

async fn create_artist(args: CreateArtistArgs) -> Result<(), String> {
    let db = open_db(&args.database_url).await?;
    let service = PgArtistsService::new(db);

    let uuid = args
        .artist_uuid
        .map_or_else(ArtistUuid::generate, ArtistUuid::from_uuid);

    let artist = service
        .create_artist(NewArtist {
            uuid,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create artist: {error}"))?;

    println!("artist_uuid: {}", artist.uuid);
    println!("artist_name: {}", artist.name);

    Ok(())
}

async fn payout_balance(args: PayoutArgs) -> Result<(), String> {
    let db = open_db(&args.database_url).await?;
    let service = PgPayoutsService::new(db);

    let balance_cents = service
        .outstanding_balance(ArtistUuid::from_uuid(args.artist_uuid))
        .await
        .map_err(|error| format!("failed to read balance: {error}"))?;

    println!("balance_cents: {balance_cents}");

    Ok(())
}

async fn payout_run(args: PayoutArgs) -> Result<(), String> {
    let db = open_db(&args.database_url).await?;
    let service = PgPayoutsService::new(db);

    let cash_out = service
        .run_cash_out(ArtistUuid::from_uuid(args.artist_uuid))
        .await
        .map_err(|error| format!("failed to run cash-out: {error}"))?;

    match cash_out {
        Some(cash_out) => {
            println!("cash_out_uuid: {}", cash_out.uuid);
            println!("total_cents: {}", cash_out.total_cents);
            println!("items: {}", cash_out.items.len());
        }
        None => println!("nothing to settle"),
    }

    Ok(())
}

async fn payout_list(args: PayoutArgs) -> Result<(), String> {
    let db = open_db(&args.database_url).await?;
    let service = PgPayoutsService::new(db);

    let cash_outs = service
        .list_cash_outs(ArtistUuid::from_uuid(args.artist_uuid))
        .await
        .map_err(|error| format!("failed to list cash-outs: {error}"))?;

    if cash_outs.is_empty() {
        println!("no cash-outs");
        return Ok(());
    }

    for cash_out in cash_outs {
        println!(
            "{} {} {} {}",
            cash_out.uuid, cash_out.status, cash_out.total_cents, cash_out.created_at
        );
    }

    Ok(())
}
