//! Hero Math entry point
//!
//! In the browser this wires keyboard, buttons and the frame clock to the
//! game controller and publishes a snapshot after every change. Natively it
//! plays a short headless demo and prints the board.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent};

    use hero_math::sim::GamePhase;
    use hero_math::{Game, Settings, input};

    /// Longest frame we simulate in one go (tab switches, breakpoints)
    const MAX_FRAME_MS: f64 = 100.0;

    // Hands the snapshot to whatever renderer the page installed
    #[wasm_bindgen(inline_js = "
        export function publish_snapshot(json) {
            if (typeof window.heroMathRender === 'function') {
                window.heroMathRender(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn publish_snapshot(json: &str);
    }

    /// Browser-side wrapper around the controller
    struct Shell {
        game: Game,
        last_time: f64,
        carry_ms: f64,
        last_published: Option<String>,
    }

    impl Shell {
        fn new(game: Game) -> Self {
            Self {
                game,
                last_time: 0.0,
                carry_ms: 0.0,
                last_published: None,
            }
        }

        /// Advance game time by the frame delta, keeping sub-millisecond remainders
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.carry_ms += dt;
            let whole = self.carry_ms.floor();
            self.carry_ms -= whole;
            if whole >= 1.0 {
                self.game.update(whole as u32);
            }
        }

        /// Push the snapshot to the page if anything changed since the last push
        fn publish(&mut self) {
            let snapshot = self.game.snapshot();
            let json = match snapshot.to_json() {
                Ok(json) => json,
                Err(e) => {
                    log::error!("Failed to serialize snapshot: {}", e);
                    return;
                }
            };
            if self.last_published.as_deref() == Some(json.as_str()) {
                return;
            }

            publish_snapshot(&json);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                update_hud(&document, &snapshot);
            }
            self.last_published = Some(json);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn update_hud(document: &Document, snapshot: &hero_math::Snapshot) {
        set_text(document, "hud-level", &snapshot.level.to_string());
        set_text(document, "hud-lives", &snapshot.lives.to_string());
        set_text(document, "hud-score", &snapshot.score.to_string());
        set_text(document, "hud-rule", &snapshot.rule_description);
        set_text(document, "hud-progress", &snapshot.progress);

        set_visible(document, "level-intro", snapshot.phase == GamePhase::Intro);
        set_text(document, "intro-title", snapshot.rule_title);
        set_visible(
            document,
            "level-complete",
            snapshot.phase == GamePhase::LevelComplete,
        );
        set_visible(document, "game-over", snapshot.phase == GamePhase::GameOver);
        if snapshot.phase == GamePhase::GameOver {
            set_text(document, "final-score", &snapshot.score.to_string());
            set_text(document, "final-level", &snapshot.level.to_string());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let settings_json = document
            .get_element_by_id("game")
            .and_then(|el| el.get_attribute("data-settings"));
        let (settings, settings_error) = Settings::resolve(settings_json.as_deref());

        if let Some(level) = settings.log_level_filter().to_level() {
            let _ = console_log::init_with_level(level);
        }
        if let Some(e) = settings_error {
            log::warn!("Using default settings: {}", e);
        }
        log::info!("Hero Math starting...");

        let seed = js_sys::Date::now() as u64;
        let shell = Rc::new(RefCell::new(Shell::new(Game::new(settings, seed))));

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_keyboard(shell.clone());
        setup_buttons(&document, shell.clone());
        shell.borrow_mut().publish();
        request_animation_frame(shell);
    }

    fn setup_keyboard(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            if !input::is_handled(&key) {
                return;
            }
            event.prevent_default();

            let mut s = shell.borrow_mut();
            if s.game.handle_key(&key).is_some() {
                s.publish();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, shell: Rc<RefCell<Shell>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut s = shell.borrow_mut();
                s.game.start_level();
                s.publish();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut s = shell.borrow_mut();
                s.game.reset();
                s.publish();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(shell, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(shell: Rc<RefCell<Shell>>, time: f64) {
        {
            let mut s = shell.borrow_mut();
            s.update(time);
            s.publish();
        }

        request_animation_frame(shell);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use hero_math::{Game, Settings};

    // Optional settings file as the first argument
    let path = std::env::args().nth(1);
    let read = path.as_deref().map(std::fs::read_to_string);
    let json = match &read {
        Some(Ok(text)) => Some(text.as_str()),
        _ => None,
    };
    let (settings, settings_error) = Settings::resolve(json);

    env_logger::Builder::new()
        .filter_level(settings.log_level_filter())
        .parse_default_env()
        .init();
    if let (Some(path), Some(Err(e))) = (&path, &read) {
        log::warn!("Could not read {}: {}", path, e);
    }
    if let Some(e) = settings_error {
        log::warn!("Using default settings: {}", e);
    }
    log::info!("Hero Math (native) starting headless demo...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut game = Game::new(settings, seed);
    demo::run(&mut game);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Greedy autoplayer for the native build
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use hero_math::Game;
    use hero_math::sim::rules::accepts;
    use hero_math::sim::{Action, Cell, Direction, GamePhase, GameState, Position};

    /// Simulated time between autoplayer inputs
    const STEP_MS: u32 = 250;
    /// Simulated time limit for the whole demo
    const MAX_MS: u32 = 5 * 60 * 1000;
    const LAST_LEVEL: u32 = 6;

    pub fn run(game: &mut Game) {
        let mut elapsed = 0;
        while elapsed < MAX_MS {
            match game.state().phase {
                GamePhase::Intro => {
                    if game.state().level > LAST_LEVEL {
                        break;
                    }
                    println!("{}", game.snapshot());
                    game.start_level();
                    println!("{}", game.snapshot());
                }
                GamePhase::Playing => {
                    let action = next_action(game.state());
                    for event in game.dispatch(action) {
                        log::debug!("{:?}", event);
                    }
                }
                GamePhase::LevelComplete => {}
                GamePhase::GameOver => break,
            }
            for event in game.update(STEP_MS) {
                log::debug!("{:?}", event);
            }
            elapsed += STEP_MS;
        }

        println!("{}", game.snapshot());
        println!(
            "Demo finished at level {} with score {} after {}s of game time",
            game.state().level,
            game.state().score,
            elapsed / 1000
        );
    }

    fn wanted(state: &GameState, cell: Cell) -> bool {
        match cell {
            Cell::Number(n) => accepts(&state.rule, &state.collected, n),
            Cell::PowerUp(_) => true,
            Cell::Empty | Cell::Obstacle => false,
        }
    }

    fn distance(a: Position, b: Position) -> u32 {
        (a.x.abs_diff(b.x) + a.y.abs_diff(b.y)) as u32
    }

    /// Collect when standing on something useful, otherwise head for the
    /// nearest useful cell without walking into obstacles or enemies
    fn next_action(state: &GameState) -> Action {
        if wanted(state, state.cell(state.hero)) {
            return Action::CollectAttempt;
        }
        let Some(board) = state.board.as_ref() else {
            return Action::CollectAttempt;
        };
        let Some(target) = board
            .iter()
            .filter(|&(_, cell)| wanted(state, cell))
            .map(|(pos, _)| pos)
            .min_by_key(|&pos| distance(state.hero, pos))
        else {
            return Action::CollectAttempt;
        };

        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(|&dir| {
                let next = state.hero.step(dir);
                next != state.hero && state.cell(next) != Cell::Obstacle && !state.enemy_at(next)
            })
            .min_by_key(|&dir| distance(state.hero.step(dir), target))
            .map(Action::MoveHero)
            .unwrap_or(Action::CollectAttempt)
    }
}
