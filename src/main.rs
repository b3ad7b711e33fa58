// Command-line harness around the penalty-kick library.
// All of the real logic lives in the lib crate (environment, agent, loops).

use std::{
    error::Error,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use tracing_subscriber::filter::LevelFilter;

use penalty_kick::{
    algo::tabular::QTable,
    config::{self, Config},
    export::export_heatmaps,
    gym::penalty_kick::RewardPolicy,
    hooks::{CueLog, Headless, Hooks, Renderer, Silent, Sound},
    runner,
};

type BoxError = Box<dyn Error + Send + Sync>;

/// Train and evaluate a Q-learning striker on the penalty-kick pitch.
#[derive(Parser, Debug)]
#[command(name = "penalty-kick", version)]
struct Cli {
    /// Also log debug records, including sound cues.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a fresh Q-table and save it.
    Train(TrainArgs),
    /// Replay one greedy episode with a saved Q-table.
    Evaluate(EvaluateArgs),
    /// Export per-action heatmaps of a saved Q-table as CSV.
    Visualize(VisualizeArgs),
}

#[derive(Args, Debug)]
struct Presentation {
    /// Draw the pitch after every step.
    #[arg(long)]
    render: bool,

    /// Emit sound cues.
    #[arg(long)]
    sound: bool,

    /// How long each rendered frame stays on screen.
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,
}

#[derive(Args, Debug)]
struct StepCap {
    /// Force-terminate an episode after this many steps.
    #[arg(long, conflicts_with = "unbounded")]
    max_steps: Option<u32>,

    /// Let episodes run until a goal or an obstacle is reached.
    #[arg(long)]
    unbounded: bool,
}

#[derive(Args, Debug)]
struct TrainArgs {
    #[arg(long)]
    episodes: Option<u32>,

    /// Learning rate.
    #[arg(long)]
    alpha: Option<f32>,

    /// Discount factor.
    #[arg(long)]
    gamma: Option<f32>,

    /// Initial exploration rate.
    #[arg(long)]
    epsilon: Option<f32>,

    #[arg(long)]
    epsilon_min: Option<f32>,

    /// Factor applied to the exploration rate after every episode.
    #[arg(long)]
    epsilon_decay: Option<f32>,

    /// Initialize the table from U[0, 1) instead of zeros.
    #[arg(long)]
    random_init: bool,

    #[arg(long, value_enum)]
    reward_policy: Option<Reward>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    q_table: Option<PathBuf>,

    /// Export heatmaps of the trained table into this directory.
    #[arg(long)]
    export: Option<PathBuf>,

    #[command(flatten)]
    cap: StepCap,

    #[command(flatten)]
    presentation: Presentation,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[arg(long, default_value = config::Q_TABLE_PATH)]
    q_table: PathBuf,

    #[arg(long, value_enum)]
    reward_policy: Option<Reward>,

    #[command(flatten)]
    cap: StepCap,

    #[command(flatten)]
    presentation: Presentation,
}

#[derive(Args, Debug)]
struct VisualizeArgs {
    #[arg(long, default_value = config::Q_TABLE_PATH)]
    q_table: PathBuf,

    #[arg(long, default_value = config::EXPORT_DIR)]
    out_dir: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Reward {
    Flat,
    Shaped,
    /// Shaped rewards, reporting the episode's running total on every step
    ShapedCumulative,
}

impl From<Reward> for RewardPolicy {
    fn from(reward: Reward) -> Self {
        match reward {
            Reward::Flat => RewardPolicy::Flat,
            Reward::Shaped => RewardPolicy::Shaped,
            Reward::ShapedCumulative => RewardPolicy::ShapedCumulative,
        }
    }
}

fn init_fmt(level: LevelFilter) -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
}

#[cfg(feature = "viz")]
fn init_logging(level: LevelFilter, render: bool) -> Result<(), BoxError> {
    if !render {
        return init_fmt(level);
    }
    let level = if level == LevelFilter::DEBUG {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    penalty_kick::viz::init_logger(level)?;
    Ok(())
}

#[cfg(not(feature = "viz"))]
fn init_logging(level: LevelFilter, _render: bool) -> Result<(), BoxError> {
    init_fmt(level)
}

#[cfg(feature = "viz")]
fn renderer(delay: Duration) -> Box<dyn Renderer> {
    Box::new(penalty_kick::viz::TerminalRenderer::new(delay))
}

#[cfg(not(feature = "viz"))]
fn renderer(delay: Duration) -> Box<dyn Renderer> {
    Box::new(penalty_kick::hooks::AsciiRenderer::stdout(delay))
}

fn build_hooks(presentation: &Presentation) -> Hooks {
    let renderer: Box<dyn Renderer> = if presentation.render {
        renderer(Duration::from_millis(presentation.frame_ms))
    } else {
        Box::new(Headless)
    };
    let sound: Box<dyn Sound> = if presentation.sound {
        Box::new(CueLog)
    } else {
        Box::new(Silent)
    };
    Hooks::new(renderer, sound)
}

fn apply_env_overrides(cfg: &mut Config, reward: Option<Reward>, cap: &StepCap) {
    if let Some(reward) = reward {
        cfg.env.reward_policy = reward.into();
    }
    if cap.unbounded {
        cfg.env.max_steps = None;
    } else if let Some(max_steps) = cap.max_steps {
        cfg.env.max_steps = Some(max_steps);
    }
}

/// Build Config from defaults, then apply CLI overrides.
fn train_config(args: &TrainArgs) -> Config {
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg, args.reward_policy, &args.cap);

    let train = &mut cfg.train;
    if let Some(episodes) = args.episodes {
        train.episodes = episodes;
    }
    if let Some(path) = &args.q_table {
        train.q_table_path = path.clone();
    }

    let agent = &mut train.agent;
    if let Some(alpha) = args.alpha {
        agent.alpha = alpha;
    }
    if let Some(gamma) = args.gamma {
        agent.gamma = gamma;
    }
    if let Some(epsilon) = args.epsilon {
        agent.epsilon = epsilon;
    }
    if let Some(epsilon_min) = args.epsilon_min {
        agent.epsilon_min = epsilon_min;
    }
    if let Some(epsilon_decay) = args.epsilon_decay {
        agent.epsilon_decay = epsilon_decay;
    }
    agent.random_init = args.random_init;
    agent.seed = args.seed;

    cfg
}

fn visualize(q_table: &Path, out_dir: &Path, cfg: &Config) -> Result<(), BoxError> {
    if !q_table.is_file() {
        warn!(
            "No saved Q-table was found at {}. Train the agent first.",
            q_table.display()
        );
        return Ok(());
    }
    let env = cfg.build_env()?;
    let table = QTable::load(q_table)?;
    let path = export_heatmaps(&table, &env, out_dir)?;
    info!("Exported heatmaps to {}", path.display());
    Ok(())
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    match cli.command {
        Command::Train(args) => {
            init_logging(level, args.presentation.render)?;
            let cfg = train_config(&args);
            let mut env = cfg.build_env()?;
            let mut hooks = build_hooks(&args.presentation);

            runner::train(&mut env, &cfg.train, &mut hooks)?;

            if let Some(dir) = &args.export {
                visualize(&cfg.train.q_table_path, dir, &cfg)?;
            }
        }
        Command::Evaluate(args) => {
            init_logging(level, args.presentation.render)?;
            let mut cfg = Config::default();
            apply_env_overrides(&mut cfg, args.reward_policy, &args.cap);
            let mut env = cfg.build_env()?;
            let mut hooks = build_hooks(&args.presentation);

            runner::evaluate(&mut env, &args.q_table, &mut hooks)?;
        }
        Command::Visualize(args) => {
            init_logging(level, false)?;
            visualize(&args.q_table, &args.out_dir, &Config::default())?;
        }
    }

    Ok(())
}
