//! Gesture-controlled music playback driven by recorded or piped hand landmarks.

use anyhow::{Context, Result};
use clap::Parser;
use gesture_conductor::config::{Config, DispatchMode};
use gesture_conductor::pipeline::{shared_params, write_params, GesturePipeline, PipelineMessage, PipelineState};
use gesture_conductor::playback::{CommandSink, PlaybackModel};
use gesture_conductor::session::GestureSession;
use gesture_conductor::source::{LandmarkSource, ReplaySource};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark recording to replay (JSON lines, `-` for stdin)
    #[arg(short, long, default_value = "-")]
    replay: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Dual-hand conductor mode (left hand dynamics, right hand tempo)
    #[arg(long)]
    conductor: bool,

    /// Deliver recorded frames at their original pace
    #[arg(long)]
    realtime: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Audio files forming the playlist
    playlist: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    if args.conductor {
        config.dispatcher.mode = DispatchMode::Conductor;
    }

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    config.validate().context("Invalid configuration")?;
    info!("Gesture Conductor ({:?} mode)", config.dispatcher.mode);

    let mut player = PlaybackModel::new();
    if player.load_playlist(&args.playlist) == 0 {
        warn!("No audio files given; commands will only update volume and tempo");
    }

    let session = GestureSession::new(config)?;
    if args.replay == "-" {
        run(ReplaySource::stdin().realtime(args.realtime), session, player)
    } else {
        let source = ReplaySource::from_path(&args.replay)?.realtime(args.realtime);
        run(source, session, player)
    }
}

fn run<S: LandmarkSource + 'static>(source: S, session: GestureSession, mut player: PlaybackModel) -> Result<()> {
    let params = shared_params(player.params());
    let mut pipeline = GesturePipeline::new();
    let rx = pipeline.start(source, session, params.clone())?;

    drain(&rx, &mut player, |p| write_params(&params, p));

    match pipeline.stop() {
        PipelineState::Failed(reason) => anyhow::bail!("Gesture pipeline failed: {}", reason),
        state => {
            info!("Finished in state {:?}", state);
            Ok(())
        }
    }
}

/// Apply every message to the player until the worker hangs up
fn drain<F>(rx: &Receiver<PipelineMessage>, player: &mut PlaybackModel, mut publish: F)
where
    F: FnMut(gesture_conductor::events::PlaybackParams),
{
    for message in rx {
        match message {
            PipelineMessage::Gesture(event) => {
                info!("{}", event.status);
                match player.apply(&event.command) {
                    Ok(status) => info!("{}", status),
                    Err(e) => warn!("{}: {}", event.kind, e),
                }
                publish(player.params());
            }
            PipelineMessage::Status(status) => info!("{}", status),
            PipelineMessage::StateChanged(PipelineState::Failed(reason)) => error!("Pipeline failed: {}", reason),
            PipelineMessage::StateChanged(state) => info!("Pipeline {:?}", state),
        }
    }
}
