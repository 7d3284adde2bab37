//! CLI frontend for the MyFirstDND dice engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mfd_dice::{AdvantageMode, DiceEngine, EngineConfig};

#[derive(Parser)]
#[command(
    name = "mfd",
    about = "MyFirstDND dice roller: notation rolls, d20 checks, attacks, and a combat log",
    version,
    propagate_version = true
)]
struct Cli {
    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Reject notations that ask for more dice than this
    #[arg(long, global = true)]
    max_dice: Option<u32>,

    /// Print records as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Print session statistics after the command
    #[arg(long, global = true)]
    stats: bool,

    /// Campaign data directory (holds combat/combat_history.json)
    #[arg(short, long, global = true, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll one or more dice notations (e.g. 2d6+3, d20, 4d8-1)
    Roll {
        /// Dice notations to roll, in order
        #[arg(required = true)]
        notations: Vec<String>,
    },

    /// Roll a d20, optionally with advantage or disadvantage
    D20 {
        /// Advantage mode: none, advantage, disadvantage
        #[arg(short, long, default_value = "none")]
        mode: AdvantageMode,
    },

    /// Make an ability check
    Check(CheckArgs),

    /// Make an attack roll, with damage on a hit
    Attack(AttackArgs),

    /// Record rolls into the campaign's combat history
    Combat {
        #[command(subcommand)]
        command: CombatCommands,
    },
}

#[derive(Subcommand)]
enum CombatCommands {
    /// Start a new combat against the named enemies
    Start {
        /// Enemy names
        enemies: Vec<String>,
    },

    /// Roll an attack and log it as a round
    Attack {
        /// Who attacks: "player" or an enemy name
        #[arg(long, default_value = "player")]
        actor: String,

        /// Round number (default: one after the last)
        #[arg(long)]
        round: Option<u32>,

        #[command(flatten)]
        attack: AttackArgs,
    },

    /// Roll an ability check and log it as a round
    Check {
        /// Who makes the check: "player" or an enemy name
        #[arg(long, default_value = "player")]
        actor: String,

        /// Round number (default: one after the last)
        #[arg(long)]
        round: Option<u32>,

        #[command(flatten)]
        check: CheckArgs,
    },

    /// Add a narrative note to the combat log
    Note {
        /// Note text
        text: String,

        /// Who the note is about: "player" or an enemy name
        #[arg(long, default_value = "player")]
        actor: String,
    },

    /// End the current combat and update statistics
    End {
        /// The player won
        #[arg(long)]
        victory: bool,

        /// One-line summary of the fight
        #[arg(long, default_value = "")]
        summary: String,
    },

    /// Show combat statistics
    Stats,
}

#[derive(Args)]
struct CheckArgs {
    /// Ability modifier
    #[arg(short, long, allow_negative_numbers = true)]
    modifier: i32,

    /// Proficiency bonus
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    proficiency: i32,

    /// Difficulty class to beat
    #[arg(long, allow_negative_numbers = true)]
    dc: Option<i32>,

    /// Advantage mode: none, advantage, disadvantage
    #[arg(long, default_value = "none")]
    mode: AdvantageMode,
}

#[derive(Args)]
struct AttackArgs {
    /// Attack bonus
    #[arg(short, long, allow_negative_numbers = true)]
    bonus: i32,

    /// Target armor class
    #[arg(long, allow_negative_numbers = true)]
    ac: i32,

    /// Weapon damage notation rolled on a hit (e.g. 1d8+3)
    #[arg(long)]
    damage: Option<String>,

    /// Advantage mode: none, advantage, disadvantage
    #[arg(long, default_value = "none")]
    mode: AdvantageMode,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mfd=warn,mfd_dice=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::default();
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_dice) = cli.max_dice {
        config = config.with_max_dice(max_dice);
    }
    let mut engine = DiceEngine::from_config(config);
    let out = commands::Output { json: cli.json };

    let result = match cli.command {
        Commands::Roll { notations } => commands::roll::run(&mut engine, &notations, out),
        Commands::D20 { mode } => commands::d20::run(&mut engine, mode, out),
        Commands::Check(args) => commands::check::run(&mut engine, &args.request(), out),
        Commands::Attack(args) => commands::attack::run(&mut engine, &args.request(), out),
        Commands::Combat { command } => {
            commands::combat::run(&mut engine, &cli.data_dir, command, out)
        }
    };

    if cli.stats {
        commands::stats::run(&engine, out);
    }

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

impl CheckArgs {
    fn request(&self) -> mfd_dice::CheckRequest {
        let request = mfd_dice::CheckRequest::new(self.modifier)
            .with_proficiency(self.proficiency)
            .with_advantage(self.mode);
        match self.dc {
            Some(dc) => request.with_dc(dc),
            None => request,
        }
    }
}

impl AttackArgs {
    fn request(&self) -> mfd_dice::AttackRequest {
        let request = mfd_dice::AttackRequest::new(self.bonus, self.ac).with_advantage(self.mode);
        match &self.damage {
            Some(notation) => request.with_damage(notation.clone()),
            None => request,
        }
    }
}
