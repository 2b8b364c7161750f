//! escrow-chess - play a scripted match against in-memory collaborators
//!
//! ```text
//! escrow-chess --moves "f2f3 e7e5 g2g4 d8h4" --wager 100
//! ```
//!
//! Prints the final match snapshot as JSON.

use anyhow::{bail, Context, Result};
use chess_engine::{Color, PieceKind, Square};
use clap::Parser;
use escrow_chess::core::ArenaConfig;
use escrow_chess::escrow::{CustodyContract, InMemoryCustody};
use escrow_chess::game::{MatchStatus, Variant, Wager};
use escrow_chess::service::{Arena, ChannelBroadcaster, InMemoryStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "escrow-chess", version, about = "Play a scripted chess match with an escrowed wager")]
struct Cli {
    /// Space-separated moves in coordinate form ("e2e4", "e7e8q" to promote)
    #[arg(long, default_value = "")]
    moves: String,

    /// Stake per player; omit for an unwagered match
    #[arg(long)]
    wager: Option<u64>,

    #[arg(long, default_value = "USDC")]
    token: String,

    #[arg(long, default_value = "white-player")]
    white: String,

    #[arg(long, default_value = "black-player")]
    black: String,

    /// Side to move resigns after the scripted moves
    #[arg(long)]
    resign: bool,

    /// Config file instead of the default `arena.json`
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn identity(&self, color: Color) -> &str {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ArenaConfig::load(cli.config.as_deref()).context("loading arena config")?;

    let custody = Arc::new(InMemoryCustody::from_config(&config));
    let arena = Arena::new(
        config,
        Arc::new(InMemoryStore::new()),
        custody.clone(),
        Arc::new(ChannelBroadcaster::default()),
    );
    let service = Arc::clone(&arena.service);

    let wager = cli.wager.map(|amount| Wager::new(amount, cli.token.clone()));
    let m = service.create_match(Variant::Standard, wager).await?;
    let code = m.code.clone();

    if let Some(amount) = cli.wager {
        custody
            .create_match(&code, &cli.white, &cli.token, amount)
            .await?;
        custody.join_match(&code, &cli.black).await?;
    }
    service.join(&code, Color::White, &cli.white).await?;
    service.join(&code, Color::Black, &cli.black).await?;

    for token in cli.moves.split_whitespace() {
        let (from, to, promotion) = parse_move(token)?;
        let snapshot = service.snapshot(&code).await?;
        if snapshot.status != MatchStatus::Active {
            bail!("move {token} played after the game ended");
        }
        let identity = cli.identity(snapshot.side_to_move);
        let played = service
            .make_move(&code, identity, from, to, promotion)
            .await
            .with_context(|| format!("move {token}"))?;
        info!("[CLI] {}. {}", played.record.move_number, played.record);
    }

    if cli.resign {
        let snapshot = service.snapshot(&code).await?;
        let identity = cli.identity(snapshot.side_to_move);
        service.resign(&code, identity).await?;
    }

    arena.settled().await;
    let snapshot = service.snapshot(&code).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    service.clock().cancel(&code);
    arena.shutdown().await;
    Ok(())
}

/// Parse `e2e4` or `e7e8q`
fn parse_move(token: &str) -> Result<(Square, Square, Option<PieceKind>)> {
    if !token.is_ascii() || !(4..=5).contains(&token.len()) {
        bail!("expected a move like e2e4 or e7e8q, got {token:?}");
    }
    let from: Square = token[0..2].parse()?;
    let to: Square = token[2..4].parse()?;
    let promotion = match token.get(4..) {
        Some(letter) if !letter.is_empty() => Some(letter.parse::<PieceKind>()?),
        _ => None,
    };
    Ok((from, to, promotion))
}
