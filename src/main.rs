//! Mark entry point
//!
//! Headless native driver: loads settings and the leaderboard, plays a seeded
//! autopilot session at a fixed step and renders every frame into a
//! recording surface.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use mark::consts::{LEADERBOARD_TOP, SIM_DT};
    use mark::persistence::FileScoreStore;
    use mark::platform::{InputFrame, Key};
    use mark::renderer::{RecordingSurface, render};
    use mark::settings::Settings;
    use mark::sim::{GamePhase, GameState, TickInput, tick};
    use mark::ScoreLedger;

    env_logger::init();
    log::info!("Mark (headless) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(Settings::FILE_NAME), PathBuf::from);
    let settings = Settings::load_or_default(&settings_path);

    let store = FileScoreStore::new(settings.score_file.clone());
    log::info!("Scores kept in {}", store.path().display());
    let ledger = ScoreLedger::open(Box::new(store));
    let mut state = GameState::new(&settings, ledger);
    log::info!("Game initialized with seed: {}", settings.seed);

    // Leave the menu on the first frame
    let start = TickInput {
        frame: InputFrame::new().with(Key::Confirm),
        idle_mode: true,
        ..Default::default()
    };
    let idle = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let frames = (settings.demo_seconds / SIM_DT).ceil().max(1.0) as u64;
    let mut surface = RecordingSurface::default();
    tick(&mut state, &start, SIM_DT);

    let mut played = 1;
    while played < frames && state.phase == GamePhase::Playing {
        tick(&mut state, &idle, SIM_DT);
        surface.clear();
        render(&state, &mut surface);
        played += 1;
    }

    let seconds = played as f32 * SIM_DT;
    match state.phase {
        GamePhase::Dead => log::info!("Autopilot died after {seconds:.1}s with {} kills", state.last_run_kills),
        _ => log::info!("Demo time up after {seconds:.1}s with {} kills", state.kills),
    }
    log::info!("Last frame issued {} draw calls", surface.commands().len());

    for (i, entry) in state.ledger.top(LEADERBOARD_TOP).iter().enumerate() {
        log::info!("{}) {} - {}", i + 1, entry.name, entry.best_kills);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation library is platform-neutral; there is no web driver
}
