pub mod app;
pub mod console;
pub mod logging;
pub mod settings;

pub use console::Console;
