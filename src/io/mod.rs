/// Command-line interface and run orchestration
pub mod cli;
/// Engine constants and output defaults
pub mod configuration;
/// Error types and result aliases
pub mod error;
/// PNG export of finished dungeons
pub mod image;
/// JSON generation group files
pub mod loader;
/// `log` backend routed through the progress display
pub mod logging;
/// Per-pass progress bars
pub mod progress;
/// Explicit timing trace
pub mod trace;
/// Animated GIF of placement order
pub mod visualization;
