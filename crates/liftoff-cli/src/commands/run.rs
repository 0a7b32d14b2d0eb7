use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{debug, info};

use liftoff_core::{
    dependency::dependency,
    drivers::{AsteroidField, ContentLayer, Galaxy, ProgressIndicator, Starfield},
    physics::DriftWorld,
    AppConfig,
};
use liftoff_tui::{
    assets::galaxy_texture,
    event::EventHandler,
    App, TerminalSurface, Theme,
};

/// How often a missing physics world is reported while loading
const PHYSICS_WARN_EVERY: Duration = Duration::from_secs(2);

pub async fn run(config: Arc<AppConfig>, debug: bool, seed: Option<u64>) -> Result<()> {
    let seed = seed.or(config.ui.seed).unwrap_or_else(|| fastrand::u64(..));
    info!(seed, "Starting liftoff");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Liftoff"))?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    let mut surface = TerminalSurface::new(terminal, Theme::default());

    let result = run_scene(config, debug, seed, &mut surface).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        surface.terminal_mut().backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    surface.terminal_mut().show_cursor()?;

    result
}

/// Draw one frame so the preloader shows the new progress
fn loading_step<B: Backend>(app: &mut App, surface: &mut TerminalSurface<B>, progress: f64) -> Result<()> {
    debug!(progress, "Loading");
    app.frame_loop.preloader_mut().set_progress(progress);
    app.tick(Instant::now(), surface)?;
    Ok(())
}

async fn run_scene<B: Backend>(
    config: Arc<AppConfig>,
    debug: bool,
    seed: u64,
    surface: &mut TerminalSurface<B>,
) -> Result<()> {
    let size = surface.terminal().size()?;
    let mut app = App::new(config.clone(), size.width, size.height)?;
    app.show_debug |= debug;
    let mut rng = fastrand::Rng::with_seed(seed);

    app.frame_loop.init();
    app.frame_loop.start(Instant::now());
    loading_step(&mut app, surface, 0.1)?;

    app.frame_loop.on_update(
        "starfield",
        Box::new(Starfield::new(config.starfield.clone(), rng.fork())),
    );
    loading_step(&mut app, surface, 0.3)?;

    // The asteroid field needs a physics world before it can spawn bodies
    let (provider, gate) = dependency("physics", PHYSICS_WARN_EVERY);
    tokio::spawn(async move {
        provider.provide(DriftWorld::new());
    });
    let world = gate.wait().await?;
    loading_step(&mut app, surface, 0.5)?;

    app.frame_loop.on_update(
        "asteroids",
        Box::new(AsteroidField::new(
            config.asteroids.clone(),
            Box::new(world),
            rng.fork(),
        )),
    );
    loading_step(&mut app, surface, 0.6)?;

    if config.galaxy.enabled {
        let texture = galaxy_texture(&config.galaxy, rng.u64(..));
        app.frame_loop
            .on_update("galaxy", Box::new(Galaxy::new(config.galaxy.clone(), texture)));
    }
    loading_step(&mut app, surface, 0.7)?;

    app.frame_loop
        .on_update("content", Box::new(ContentLayer::new(config.content.clone())));
    loading_step(&mut app, surface, 0.85)?;

    app.frame_loop.on_update(
        "indicator",
        Box::new(ProgressIndicator::new(config.indicator.clone(), rng.fork())),
    );
    loading_step(&mut app, surface, 1.0)?;
    app.frame_loop.preloader_mut().hide_default(Instant::now());

    let event_handler = EventHandler::with_fps(config.ui.fps);

    // Main loop
    loop {
        app.tick(Instant::now(), surface)?;

        if let Some(event) = event_handler.next()? {
            app.handle_event(event, Instant::now());
        }
        for event in event_handler.drain()? {
            app.handle_event(event, Instant::now());
        }

        if app.should_quit {
            break;
        }
    }

    app.frame_loop.stop();
    app.frame_loop.destroy();
    info!("Liftoff finished");
    Ok(())
}
