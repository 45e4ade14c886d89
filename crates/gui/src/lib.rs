// Library crate: exposes application state and the settings store for tests.
// GUI-specific modules (app, viewport rendering) remain in the binary crate.

pub mod state;
