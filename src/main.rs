//! Space Snake entry point
//!
//! The simulation is headless; a browser embedder drives it through the
//! library crate. The native binary runs a scripted smoke session so the
//! core loop can be exercised and profiled without a browser.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use space_snake::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use space_snake::persistence::Progress;
    use space_snake::{FrameInput, GameEvent, GameState, SoundCue, step};

    env_logger::init();
    log::info!("Space Snake (native) starting headless session");

    let mut progress = Progress::load();
    let today = space_snake::persistence::today();
    if !progress.use_credit(&today) {
        log::warn!("no credits left today");
        return;
    }

    let mut state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT, 0xC0FFEE);
    let dt_ms = 1000.0 / 60.0;

    // Two simulated minutes: sweep left and right with fire held, enough
    // to see spawning, a boss cycle, and level progression in the log
    for frame in 0..7200u32 {
        let sweep = ((frame as f32) * 0.01).sin();
        let input = FrameInput {
            move_dir: Vec2::new(sweep, 0.0),
            pointer_target: None,
            fire: true,
            pause: false,
        };
        step(&mut state, &input, dt_ms);

        for event in state.drain_events() {
            match event {
                GameEvent::Sound(_) => {}
                GameEvent::GameOver { score, stage } => {
                    log::info!("game over at score {score}, stage {stage}");
                }
                other => log::debug!("{other:?}"),
            }
        }
        if state.phase == space_snake::sim::GamePhase::GameOver {
            break;
        }
    }

    let new_record = progress.record_score(state.score);
    if new_record {
        log::info!("sound cue: {:?}", SoundCue::NewHighScore);
    }
    progress.save();

    println!(
        "session finished: score {} level {} stage {}{}",
        state.score,
        state.level,
        state.stage_number(),
        if new_record { " (new record)" } else { "" },
    );
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    space_snake::init_wasm_logging();
    log::info!("Space Snake (wasm) simulation core ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
