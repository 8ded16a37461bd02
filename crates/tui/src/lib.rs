//! Interactive terminal UI for `slidescope`.
//!
//! Contains the application state container, the event loop, the rendering
//! pipeline, and the input widgets that power the terminal viewer.

mod app;
pub mod input;
mod runtime;

pub use app::App;
pub use input::QueryInput;
pub use runtime::run;
