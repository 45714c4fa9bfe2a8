//! Conquid - command-line front end
//!
//! Every command loads the game's log, rebuilds the turn cache by replay,
//! and writes the log back after an accepted change.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use conquid::{
    Action, Board, GameConfig, GameLog, GameRecord, GameStatus, JsonFileStore, LogStore, Move, Player,
    TurnCache,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    let store = JsonFileStore::new(config.data_dir())?;

    match cli.command {
        Command::New { id } => new_game(&store, &config, &id),
        Command::Play { id, player, action } => play(&store, &id, player, Move::new(seat(player)?, action.into())),
        Command::Show { id, at } => show(&store, &id, at),
        Command::Replay { id } => replay(&store, &id),
        Command::Spots { id, player } => spots(&store, &id, seat(player)?),
        Command::Draw { id } => draw(&store, &id),
        Command::List => list(&store),
    }
}

fn seat(number: u8) -> Result<Player> {
    Player::from_number(number).with_context(|| format!("No player {}", number))
}

fn load(store: &impl LogStore, id: &str) -> Result<GameRecord> {
    store
        .load(id)?
        .with_context(|| format!("No game named '{}'", id))
}

fn open(store: &impl LogStore, id: &str) -> Result<TurnCache> {
    TurnCache::from_record(load(store, id)?)
        .with_context(|| format!("Stored log for '{}' is corrupt", id))
}

fn print_board(board: &Board, status: GameStatus, to_move: Player) {
    println!("{}", board);
    match status {
        GameStatus::InProgress => println!("{} to move", to_move),
        GameStatus::Finished(outcome) => println!("Game over. {}", outcome),
    }
}

/// Creates and stores an empty game.
#[instrument(skip(store, config))]
fn new_game(store: &impl LogStore, config: &GameConfig, id: &str) -> Result<()> {
    if store.load(id)?.is_some() {
        bail!("Game '{}' already exists", id);
    }
    let log = GameLog::new(config.setup())?;
    store.save(id, &log.record())?;
    info!(id, "Game created");

    let cache = TurnCache::new(log)?;
    print_board(cache.latest(), cache.status(), cache.current_player());
    Ok(())
}

/// Submits one move and stores the log if it was accepted.
#[instrument(skip(store, mv), fields(player = %mv.player, kind = mv.kind()))]
fn play(store: &impl LogStore, id: &str, player: u8, mv: Move) -> Result<()> {
    let mut cache = open(store, id)?;
    let mover = mv.player;
    let erase = matches!(mv.action, Action::Erase { .. });

    match cache.submit(mv) {
        Ok(snapshot) => {
            store.save(id, &cache.log().record())?;
            println!("{}", snapshot);
            match snapshot.status() {
                GameStatus::InProgress => println!("{} to move", cache.current_player()),
                GameStatus::Finished(outcome) => println!("Game over. {}", outcome),
            }
            Ok(())
        }
        Err(err) => {
            warn!(%err, "Move refused");
            if erase {
                let spots = cache.latest().erase_spots(mover);
                if !spots.is_empty() {
                    let spots: Vec<_> = spots.iter().map(|p| format!("{},{}", p.row, p.col)).collect();
                    eprintln!("Legal erase corners: {}", spots.join(" "));
                }
            }
            bail!("Player {} move refused: {}", player, err)
        }
    }
}

/// Prints the latest board, or the board after `at` moves.
#[instrument(skip(store))]
fn show(store: &impl LogStore, id: &str, at: Option<usize>) -> Result<()> {
    let cache = open(store, id)?;
    match at {
        Some(n) => {
            let board = cache
                .log()
                .board_at(n)?
                .with_context(|| format!("Game has only {} moves", cache.move_number()))?;
            println!("After move {}:", n);
            println!("{}", board);
        }
        None => print_board(cache.latest(), cache.status(), cache.current_player()),
    }
    Ok(())
}

/// Prints every board in the game's history.
#[instrument(skip(store))]
fn replay(store: &impl LogStore, id: &str) -> Result<()> {
    let cache = open(store, id)?;
    let moves = cache.log().moves();
    let boards = cache.log().replay()?;

    for (n, board) in boards.iter().enumerate() {
        match n.checked_sub(1).and_then(|i| moves.get(i)) {
            Some(mv) => println!("Move {}: {}", n, mv),
            None => println!("Initial board"),
        }
        println!("{}\n", board);
    }
    if let Some(outcome) = cache.status().outcome() {
        println!("Game over. {}", outcome);
    }
    Ok(())
}

/// Lists legal erase corners for `player`.
#[instrument(skip(store))]
fn spots(store: &impl LogStore, id: &str, player: Player) -> Result<()> {
    let cache = open(store, id)?;
    let spots = cache.latest().erase_spots(player);
    if spots.is_empty() {
        println!("{} has no legal erase", player);
    }
    for pos in spots {
        println!("{},{}", pos.row, pos.col);
    }
    Ok(())
}

/// Ends the game as a draw.
#[instrument(skip(store))]
fn draw(store: &impl LogStore, id: &str) -> Result<()> {
    let mut cache = open(store, id)?;
    let snapshot = cache.conclude_draw()?;
    store.save(id, &cache.log().record())?;
    println!("{}", snapshot);
    println!("Game over. Draw");
    Ok(())
}

/// Lists stored game ids.
#[instrument(skip(store))]
fn list(store: &impl LogStore) -> Result<()> {
    for id in store.list()? {
        println!("{}", id);
    }
    Ok(())
}
