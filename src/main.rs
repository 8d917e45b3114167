//! DCB Sim - Main Binary
//!
//! Runs single battles (optionally with a human at the keyboard) or
//! tournaments of automated battles.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use dcb_sim::{
    core::Player,
    game::{
        Battle, BattleConfig, BattleController, FirstChoiceController, InteractiveController, OutputFormat,
        OutputMode, RandomController, VerbosityLevel,
    },
    loader::{CardCatalog, DeckList, DeckLoader},
    tournament::{self, TournamentConfig},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Controller type for players
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always chooses the first option (for testing)
    First,
    /// Makes random choices
    Random,
    /// Text UI controller for human play via stdin
    Tui,
}

/// Verbosity level for battle output (accepts names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "dcb")]
#[command(about = "DCB Sim - Digital Card Battle simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single battle between two decks
    Battle {
        /// Card catalog (JSON array of card records)
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Decklist for player 1 (JSON array of card names)
        #[arg(value_name = "PLAYER1_DECK")]
        deck1: PathBuf,

        /// Decklist for player 2
        #[arg(value_name = "PLAYER2_DECK")]
        deck2: PathBuf,

        /// Player 1 controller type
        #[arg(long, value_enum, default_value = "tui")]
        p1: ControllerType,

        /// Player 2 controller type
        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerType,

        #[arg(long, default_value = "Player 1")]
        p1_name: String,

        #[arg(long, default_value = "Player 2")]
        p2_name: String,

        /// Set random seed for deterministic testing
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum number of player turns
        #[arg(long, default_value_t = BattleConfig::default().max_turns)]
        max_turns: u32,

        /// Verbosity level for battle output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Emit log lines as JSON objects
        #[arg(long)]
        json_log: bool,

        /// Also write the full battle log to this file (JSON lines)
        #[arg(long, value_name = "PATH")]
        log_file: Option<PathBuf>,
    },

    /// Run many automated battles in parallel and print statistics
    Tourney {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Decklists to draw pairings from
        #[arg(value_name = "DECK", required = true)]
        decks: Vec<PathBuf>,

        /// Number of battles to play
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        #[arg(long, value_enum, default_value = "random")]
        p1: ControllerType,

        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerType,

        /// Tournament seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = BattleConfig::default().max_turns)]
        max_turns: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Battle {
            catalog,
            deck1,
            deck2,
            p1,
            p2,
            p1_name,
            p2_name,
            seed,
            max_turns,
            verbosity,
            json_log,
            log_file,
        } => {
            let config = BattleConfig {
                max_turns,
                verbosity: verbosity.0,
                seed,
            };
            run_battle(
                &catalog,
                [deck1.as_path(), deck2.as_path()],
                [p1, p2],
                [p1_name, p2_name],
                config,
                json_log,
                log_file.as_deref(),
            )
        }
        Commands::Tourney {
            catalog,
            decks,
            games,
            p1,
            p2,
            seed,
            max_turns,
        } => {
            let config = TournamentConfig {
                games,
                p1: tourney_controller(p1)?,
                p2: tourney_controller(p2)?,
                seed,
                max_turns,
            };
            run_tourney(&catalog, &decks, &config)
        }
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<Arc<CardCatalog>> {
    let catalog = CardCatalog::load_from_file(path)
        .with_context(|| format!("failed to load card catalog {}", path.display()))?;
    Ok(Arc::new(catalog))
}

fn load_deck(path: &Path) -> anyhow::Result<DeckList> {
    DeckLoader::load_from_file(path).with_context(|| format!("failed to load decklist {}", path.display()))
}

fn build_controller(kind: ControllerType, seed: Option<u64>) -> Box<dyn BattleController> {
    match kind {
        ControllerType::First => Box::new(FirstChoiceController::new()),
        ControllerType::Random => match seed {
            Some(seed) => Box::new(RandomController::with_seed(seed)),
            None => Box::new(RandomController::new()),
        },
        ControllerType::Tui => Box::new(InteractiveController::stdio()),
    }
}

fn tourney_controller(kind: ControllerType) -> anyhow::Result<tournament::ControllerType> {
    match kind {
        ControllerType::First => Ok(tournament::ControllerType::First),
        ControllerType::Random => Ok(tournament::ControllerType::Random),
        ControllerType::Tui => bail!("the tui controller cannot play tournament battles"),
    }
}

fn run_battle(
    catalog_path: &Path,
    deck_paths: [&Path; 2],
    controllers: [ControllerType; 2],
    names: [String; 2],
    config: BattleConfig,
    json_log: bool,
    log_file: Option<&Path>,
) -> anyhow::Result<()> {
    if matches!(controllers, [ControllerType::Tui, ControllerType::Tui]) {
        // Both would hold the stdin lock
        bail!("only one player can use the tui controller");
    }

    let catalog = load_catalog(catalog_path)?;
    let [deck1, deck2] = deck_paths.map(load_deck);
    let deck1 = deck1?.build(&catalog).context("failed to build player 1 deck")?;
    let deck2 = deck2?.build(&catalog).context("failed to build player 2 deck")?;

    // Derive controller seeds
    let seeds = match config.seed {
        Some(seed) => [Some(seed.wrapping_add(0x1234_5678_9ABC_DEF0)), Some(seed.wrapping_add(0xFEDC_BA98_7654_3210))],
        None => [None, None],
    };
    let mut controller1 = build_controller(controllers[0], seeds[0]);
    let mut controller2 = build_controller(controllers[1], seeds[1]);

    let [name1, name2] = names;
    let mut player1 = Player::new(name1, deck1, &mut *controller1);
    let mut player2 = Player::new(name2, deck2, &mut *controller2);

    let mut battle = Battle::new(config);
    if json_log {
        battle.logger_mut().set_output_format(OutputFormat::Json);
    }
    if log_file.is_some() {
        // Print as usual and keep every entry for the file
        battle.logger_mut().set_output_mode(OutputMode::Both);
    }
    let result = battle.battle(&mut player1, &mut player2)?;

    if json_log {
        println!("{}", serde_json::to_string(&result)?);
    }
    if let Some(path) = log_file {
        let mut lines = String::new();
        for entry in battle.logger().logs().iter() {
            lines.push_str(&serde_json::to_string(entry)?);
            lines.push('\n');
        }
        std::fs::write(path, lines).with_context(|| format!("failed to write battle log {}", path.display()))?;
    }
    Ok(())
}

fn run_tourney(catalog_path: &Path, deck_paths: &[PathBuf], config: &TournamentConfig) -> anyhow::Result<()> {
    println!("=== DCB Sim - Tournament Mode ===\n");

    let catalog = load_catalog(catalog_path)?;
    println!("Loaded {} cards", catalog.len());

    let decks = deck_paths
        .iter()
        .map(|path| load_deck(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    for deck in &decks {
        println!("  {}: {} cards", deck.name, deck.total_cards());
    }
    println!("\nRunning {} games, seed {}", config.games, config.seed);
    println!("Controllers: P1={:?}, P2={:?}\n", config.p1, config.p2);

    let start = std::time::Instant::now();
    let stats = tournament::run_tournament(&catalog, &decks, config)?;
    let elapsed = start.elapsed();

    println!("=== Tournament Complete ===");
    println!("Total games played: {}", stats.games_played);
    println!("Elapsed time: {:.2}s\n", elapsed.as_secs_f64());
    print!("{stats}");
    Ok(())
}
