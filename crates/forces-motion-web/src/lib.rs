pub mod runner;

pub use runner::ScreenRunner;

/// Generate all `#[wasm_bindgen]` exports for a screen.
///
/// Generates:
/// - `thread_local!` storage for the ScreenRunner
/// - `with_runner()` helper function
/// - wasm-bindgen exports (init, tick, input, config, state and event accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use forces_motion::Sim;
///
/// forces_motion_web::export_screen!(Sim, "forces-and-motion-basics");
/// ```
///
/// # Arguments
///
/// - `$screen_type`: a type implementing `forces_motion::Screen` with a `new()` constructor
/// - `$screen_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_screen {
    ($screen_type:ty, $screen_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::ScreenRunner<$screen_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::ScreenRunner<$screen_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Screen not initialized. Call screen_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn screen_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let screen = <$screen_type>::new();
            let runner = $crate::ScreenRunner::new(screen);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $screen_name);
        }

        /// Advance by one host frame of `dt` seconds.
        #[wasm_bindgen]
        pub fn screen_tick(dt: f64) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn screen_custom_event(kind: u32, a: f64, b: f64, c: f64) {
            with_runner(|r| r.push_custom(kind, a, b, c));
        }

        #[wasm_bindgen]
        pub fn screen_reset() {
            with_runner(|r| r.reset());
        }

        /// Returns false (and keeps the current config) if the JSON is invalid.
        #[wasm_bindgen]
        pub fn screen_load_config(json: &str) -> bool {
            with_runner(|r| match r.load_config(json) {
                Ok(()) => true,
                Err(err) => {
                    log::error!("{}: bad config: {}", $screen_name, err);
                    false
                }
            })
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_state_json() -> String {
            with_runner(|r| match r.state_json() {
                Ok(json) => json,
                Err(err) => {
                    log::error!("{}: state snapshot failed: {}", $screen_name, err);
                    String::from("null")
                }
            })
        }

        #[wasm_bindgen]
        pub fn get_sim_events_ptr() -> *const f32 {
            with_runner(|r| r.sim_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sim_events_len() -> u32 {
            with_runner(|r| r.sim_events_len())
        }
    };
}
