//! Command-line interface for conquid.

use clap::{Parser, Subcommand};
use conquid::{Action, Position};
use std::path::PathBuf;

/// Conquid - two-player territory game with a replayable move log
#[derive(Parser, Debug)]
#[command(name = "conquid")]
#[command(about = "Play and replay Conquid games stored as move logs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML game configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the directory holding game logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new game with the configured board
    New {
        /// Game id (letters, digits, `-` and `_`)
        id: String,
    },

    /// Submit a move
    Play {
        /// Game id
        id: String,

        /// Player number (1 or 2)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
        player: u8,

        /// The move to make
        #[command(subcommand)]
        action: ActionCommand,
    },

    /// Print the board
    Show {
        /// Game id
        id: String,

        /// Show the board after this many moves instead of the latest
        #[arg(long)]
        at: Option<usize>,
    },

    /// Print every board in the game's history
    Replay {
        /// Game id
        id: String,
    },

    /// List corners where a player may erase
    Spots {
        /// Game id
        id: String,

        /// Player number (1 or 2)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
        player: u8,
    },

    /// End the game as a draw agreed by both players
    Draw {
        /// Game id
        id: String,
    },

    /// List stored games
    List,
}

/// Move kinds as typed on the command line.
#[derive(Subcommand, Debug, Clone)]
pub enum ActionCommand {
    /// Claim unowned cells, given as `row,col`
    Claim {
        /// Cells to claim
        #[arg(required = true, value_parser = parse_position)]
        cells: Vec<Position>,
    },

    /// Convert enemy cells touched from two sides
    Capture,

    /// Clear the uniform 4x4 block whose top-left is `row,col`
    Erase {
        /// Top-left corner of the block
        #[arg(value_parser = parse_position)]
        corner: Position,
    },

    /// Claim victory through an owned path into the enemy base
    Win,
}

impl From<ActionCommand> for Action {
    fn from(command: ActionCommand) -> Self {
        match command {
            ActionCommand::Claim { cells } => Action::Claim { cells },
            ActionCommand::Capture => Action::Capture,
            ActionCommand::Erase { corner } => Action::Erase { corner },
            ActionCommand::Win => Action::PathWin,
        }
    }
}

/// Parses `row,col` into a position.
pub fn parse_position(s: &str) -> Result<Position, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected row,col but got '{}'", s))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("invalid row '{}': {}", row, e))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{}': {}", col, e))?;
    Ok(Position::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("3,14"), Ok(Position::new(3, 14)));
        assert_eq!(parse_position(" 0 , 2"), Ok(Position::new(0, 2)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("-1,2").is_err());
    }

    #[test]
    fn test_play_claim_parses() {
        let cli = Cli::parse_from(["conquid", "play", "g1", "--player", "1", "claim", "1,2", "3,4"]);
        match cli.command {
            Command::Play { id, player, action } => {
                assert_eq!(id, "g1");
                assert_eq!(player, 1);
                assert_eq!(
                    Action::from(action),
                    Action::Claim {
                        cells: vec![Position::new(1, 2), Position::new(3, 4)]
                    }
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_player_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["conquid", "play", "g1", "--player", "3", "capture"]).is_err());
    }
}
