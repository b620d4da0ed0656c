use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use sweeper_bot::*;
use sweeper_core::{Game, GameConfig};
use sweeper_surface::Surface;
use sweeper_vision::{Frame, draw_grid, reconstruct};

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper with random-move agents and a pixel board reader")]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// TOML file with game, agent, vision and debug settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play in the terminal: `o ROW COL` opens, `f ROW COL` flags, `q` quits
    Play(GameArgs),
    /// Random agent that activates cells in-process
    Direct(AgentArgs),
    /// Random agent that clicks cell centres and reads frames back
    Pixel(AgentArgs),
    /// Random agent printing the reconstructed board whenever it changes
    Monitor(AgentArgs),
    /// Reconstruct the board from a PNG screenshot
    Analyze {
        image: PathBuf,

        /// Write the frame with detected rows outlined here
        #[arg(long)]
        overlay: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct GameArgs {
    #[arg(long)]
    rows: Option<u8>,

    #[arg(long)]
    cols: Option<u8>,

    #[arg(long)]
    mines: Option<u16>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct AgentArgs {
    #[command(flatten)]
    game: GameArgs,

    /// Stop after this many finished games
    #[arg(short = 'n', long)]
    max_games: Option<u32>,

    /// Move attempts per batch
    #[arg(long)]
    num_moves: Option<u32>,

    /// Seconds between moves
    #[arg(long)]
    delay: Option<f64>,

    /// Skip all waiting
    #[arg(long)]
    instant: bool,

    /// Print final statistics as JSON
    #[arg(long)]
    json: bool,

    /// Do not write debug screenshots
    #[arg(long)]
    no_debug: bool,
}

impl GameArgs {
    fn apply(&self, config: &mut BotConfig) -> Result<()> {
        let rows = self.rows.unwrap_or(config.game.rows());
        let cols = self.cols.unwrap_or(config.game.cols());
        let mines = self.mines.unwrap_or(config.game.mines);
        config.game = GameConfig::new((rows, cols), mines)
            .with_context(|| format!("invalid board {rows}x{cols} with {mines} mines"))?;
        if self.seed.is_some() {
            config.agent.seed = self.seed;
        }
        Ok(())
    }
}

impl AgentArgs {
    fn apply(&self, config: &mut BotConfig) -> Result<()> {
        self.game.apply(config)?;
        if self.max_games.is_some() {
            config.agent.max_games = self.max_games;
        }
        if let Some(num_moves) = self.num_moves {
            config.agent.num_moves = num_moves;
        }
        if let Some(delay) = self.delay {
            config.agent.delay = delay;
        }
        if self.no_debug {
            config.debug.enabled = false;
        }
        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<BotConfig> {
    match path {
        Some(path) => BotConfig::from_path(path).context("failed to load configuration"),
        None => Ok(BotConfig::default()),
    }
}

fn run_agent(strategy: Strategy, args: &AgentArgs, mut config: BotConfig) -> Result<()> {
    args.apply(&mut config)?;
    let pacing = if args.instant {
        Pacing::Instant
    } else {
        Pacing::RealTime
    };

    let mut bot = Bot::new(VirtualDesktop::new(config.layout), strategy, &config, pacing);
    if strategy == Strategy::Pixel && config.debug.enabled {
        let debug = DebugArtifacts::new(&config.debug.directory).with_context(|| {
            format!("failed to prepare {}", config.debug.directory.display())
        })?;
        bot = bot.with_debug(debug);
    }

    let stats = bot.run()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{stats}");
    }
    Ok(())
}

fn parse_coords(mut words: std::str::SplitWhitespace<'_>) -> Option<(u8, u8)> {
    let row = words.next()?.parse().ok()?;
    let col = words.next()?.parse().ok()?;
    Some((row, col))
}

fn play(args: &GameArgs, mut config: BotConfig) -> Result<()> {
    args.apply(&mut config)?;

    let seed = config.agent.seed.unwrap_or_else(rand::random);
    let game = Game::random(config.game, seed)?;
    let mut surface = Surface::new(game, config.layout);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        println!("{}", surface.game());
        println!("{}", surface.status_text());
        if surface.is_inert() {
            return Ok(());
        }
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let mut words = line.split_whitespace();
        let result = match words.next() {
            Some("q") => return Ok(()),
            Some("o") => parse_coords(words).map(|coords| surface.activate(coords).map(|_| ())),
            Some("f") => parse_coords(words).map(|coords| surface.toggle_flag(coords).map(|_| ())),
            _ => None,
        };
        match result {
            Some(Ok(())) => {}
            Some(Err(err)) => println!("{err}"),
            None => println!("Commands: o ROW COL, f ROW COL, q"),
        }
    }
}

fn analyze(path: &Path, overlay: Option<&Path>, config: &BotConfig) -> Result<()> {
    let image = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgb8();
    let frame = Frame::from_rgb_image(&image)?;
    let result = reconstruct(&frame, &config.vision);

    log::info!(
        "{} candidate boxes, {} cells, {} rows",
        result.segmentation.candidates.len(),
        result.segmentation.cells.len(),
        result.grid.row_count()
    );
    if result.reading.is_empty() {
        bail!("no board found in {}", path.display());
    }
    println!("{}", result.reading);

    if let Some(overlay) = overlay {
        draw_grid(&frame, &result.grid)
            .save(overlay)
            .with_context(|| format!("failed to write {}", overlay.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Play(args) => play(args, config),
        Command::Direct(args) => run_agent(Strategy::Direct, args, config),
        Command::Pixel(args) => run_agent(Strategy::Pixel, args, config),
        Command::Monitor(args) => run_agent(Strategy::Monitor, args, config),
        Command::Analyze { image, overlay } => analyze(image, overlay.as_deref(), &config),
    }
}
