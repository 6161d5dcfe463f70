//! Aries Runner entry point
//!
//! Native builds run a headless session and log the event stream; the web
//! build is driven from JS through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use aries_runner::consts::SIM_DT;
    use aries_runner::highscores::FileStore;
    use aries_runner::input::{Autopilot, InputSource, IntentQueue};
    use aries_runner::sim::GameEvent;
    use aries_runner::{Simulation, Tuning};
    use clap::Parser;

    /// Run the simulation headless and log its events
    #[derive(Parser, Debug)]
    #[command(name = "aries-runner", version, about)]
    pub struct Options {
        /// Base seed for track generation
        #[arg(long, default_value_t = 0xA21E5)]
        pub seed: u64,
        /// Simulated seconds to run
        #[arg(long, default_value_t = 60.0)]
        pub seconds: f32,
        /// JSON file overriding the default tuning
        #[arg(long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,
        /// Where the best score is kept
        #[arg(long, value_name = "FILE", default_value = "aries_best_score.json")]
        pub best_file: PathBuf,
        /// No input at all: run until the first hazard
        #[arg(long)]
        pub idle: bool,
        /// Start a new run as soon as the last one is reported
        #[arg(long)]
        pub auto_restart: bool,
    }

    pub fn run(opts: Options) {
        let tuning = match &opts.tuning {
            Some(path) => match Tuning::load(path) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("{}; falling back to default tuning", e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };

        let store = FileStore::new(opts.best_file.clone());
        let mut sim = Simulation::new(opts.seed, tuning, Box::new(store));
        log::info!("Best score so far: {}", sim.best_score());

        let mut source: Box<dyn InputSource> = if opts.idle {
            Box::new(IntentQueue::new())
        } else {
            Box::new(Autopilot {
                auto_restart: opts.auto_restart,
                ..Autopilot::default()
            })
        };

        let ticks = (opts.seconds.max(0.0) / SIM_DT).round() as u64;
        for _ in 0..ticks {
            for event in sim.run(source.as_mut(), 1) {
                log_event(&event);
            }
        }

        let state = sim.state();
        log::info!(
            "Stopped after {} ticks: phase {:?}, score {}, speed {:.0}, {} live segments",
            state.time_ticks,
            state.phase,
            state.total_score(),
            state.world.speed,
            state.track.live_count()
        );
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Jumped { .. } | GameEvent::GroundContact | GameEvent::DashEnded => {
                log::debug!("{:?}", event)
            }
            GameEvent::HazardCleared { position } => {
                log::info!("Hazard cleared at x={:.0}", position.x)
            }
            _ => log::info!("{:?}", event),
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Aries Runner (headless) starting...");

    headless::run(headless::Options::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
