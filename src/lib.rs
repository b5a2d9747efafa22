//! Balloon Math core crate.
//!
//! Arithmetic quiz gameplay (multiplication / division balloons) compiled to
//! WASM for the browser. `start_game()` mounts the start screen; the round
//! logic itself is plain Rust so it can be exercised natively under
//! `cargo test`.

use wasm_bindgen::prelude::*;

mod game;

pub use game::GameSession;
pub use game::history::{HISTORY_KEY, KeyValueStore, MemoryStore, ScoreHistory};
pub use game::question::{
    GeneratorConfig, Operation, Question, build_answer_set, difficulty_base, generate,
    generate_distractors,
};
pub use game::round::{Notice, NoticeKind, Outcome, Phase, Round, RoundConfig};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Shared UI datasets (tutorial text and key bindings)
// -----------------------------------------------------------------------------

/// Tutorial overlay steps shown before the first round: (title, description).
pub const TUTORIAL_STEPS: &[(&str, &str)] = &[
    (
        "¡Bienvenido a Explosión de Matemáticas!",
        "Aprenderemos multiplicación y división de una manera divertida.",
    ),
    (
        "¿Cómo jugar?",
        "Verás una operación matemática y cuatro globos con diferentes respuestas.",
    ),
    (
        "Elige tu respuesta",
        "Puedes hacer clic en el globo con la respuesta correcta o usar las teclas A, S, D, F del teclado.",
    ),
    (
        "¡Gana puntos!",
        "Por cada respuesta correcta ganarás una estrella. ¡Intenta conseguir todas las que puedas!",
    ),
];

/// Keyboard bindings for the four answer slots, in slot order.
pub const OPTION_KEYS: [char; 4] = ['a', 's', 'd', 'f'];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::dom::mount_start_screen()
}
