//! WASM bindings for the math entry interaction.
//!
//! Exposes `MathEntryInteraction` to the host rendering engine with the
//! usual portable custom interaction surface: `initialize`, `getResponse`,
//! `setResponse`, `resetResponse`, `getSerializedState`,
//! `setSerializedState`, `destroy`, plus `on` / `off` / `trigger` for events.
//!
//! MathQuill must be loaded on the page before this module starts.

#![cfg(all(target_arch = "wasm32", target_os = "unknown"))]

mod host;
mod interaction;
mod types;

pub use interaction::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Set up panics, logging and the gap embed.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing();
    math_entry_browser::install_gap_embed();
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // The embedding page may already have installed a subscriber.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}
