use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};
use wireframe_renderer::{
    config::{create_clap_command, handle_clap_matches},
    core::MeshError,
    logging,
    renderers::{HeadlessPresenter, ImagePresenter, TerminalPresenter, WindowPresenter},
    Config, DisplayTarget, Mesh, Metrics, Present, Renderer, Scene,
};

const LOG_FILE: &str = "wireframe_renderer.log";
const WINDOW_TITLE: &str = "Wireframe Renderer";
const FRAME_DURATION: Duration = Duration::from_millis(16); // ~60 FPS

fn main() -> ExitCode {
    let matches = create_clap_command().get_matches();
    let config = match handle_clap_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(config.log_level, config.target, Path::new(LOG_FILE)) {
        eprintln!("failed to initialise logging: {}", e);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_mesh(config: &Config) -> Result<Mesh, MeshError> {
    let Some(path) = &config.model else {
        return Ok(Mesh::create_cube());
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut mesh = Mesh::from_obj(path, &mut rng)?;
    mesh.normalize();
    Ok(mesh)
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let mesh = load_mesh(config)?;
    let scene = Scene::new(mesh, config.width as f32 / config.height as f32);

    match config.target {
        DisplayTarget::Window => {
            let presenter = WindowPresenter::new(WINDOW_TITLE, config.width, config.height)?;
            run_loop(
                config,
                scene,
                presenter,
                Some(FRAME_DURATION),
                |p| p.is_open(),
                |p, summary| p.set_title(&format!("{} | {}", WINDOW_TITLE, summary)),
            )?;
        }
        DisplayTarget::Terminal => {
            let presenter = TerminalPresenter::new()?;
            run_loop(config, scene, presenter, Some(FRAME_DURATION), |p| p.is_open(), |_, _| {})?;
        }
        DisplayTarget::Image => {
            let presenter = ImagePresenter::new(&config.output);
            run_loop(config, scene, presenter, None, |_| true, |_, _| {})?;
        }
        DisplayTarget::Headless => {
            run_loop(config, scene, HeadlessPresenter::default(), None, |_| true, |_, _| {})?;
        }
    }
    Ok(())
}

fn run_loop<P, F, R>(
    config: &Config,
    mut scene: Scene,
    presenter: P,
    frame_duration: Option<Duration>,
    mut keep_running: F,
    mut on_report: R,
) -> wireframe_renderer::Result<()>
where
    P: Present,
    F: FnMut(&mut P) -> bool,
    R: FnMut(&mut P, &str),
{
    let mut renderer = Renderer::new(config.width, config.height, presenter)?;
    renderer.set_clear_color(config.clear_color);
    scene.upload(&mut renderer)?;

    let mut metrics = Metrics::new();
    let mut frames = 0u64;

    while keep_running(renderer.presenter_mut()) {
        if config.frames.is_some_and(|limit| frames >= limit) {
            break;
        }
        let started = Instant::now();

        let (delta, report) = metrics.tick();
        scene.update(delta);
        let stats = scene.render(&mut renderer)?;
        frames += 1;

        if report {
            let summary = metrics.to_string();
            log::info!("{} | {} triangles, {} lines", summary, stats.triangles, stats.lines);
            on_report(renderer.presenter_mut(), &summary);
            metrics.reset_window();
        }

        if let Some(budget) = frame_duration {
            if let Some(rest) = budget.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    log::info!("Rendered {} frames", frames);
    Ok(())
}
