//! Engine constants and runtime configuration defaults

/// Side length of the square tile grid
pub const DEFAULT_GRID_SIZE: usize = 63;

// Placement search bounds
/// Candidate cells examined for one queued room before it is requeued
pub const PLACEMENT_ATTEMPT_CAP: usize = 20;
/// Attempt count from which acceptance is forced
pub const GUARANTEED_PLACEMENT_ATTEMPT: usize = 16;
/// Frontier refreshes per priority tier before moving to the next tier
pub const TIER_SWEEPS: usize = 4;

// Anti-stall: a pass may dequeue at most this many times its queue length
/// Multiplier applied to the initial queue length to bound dequeues
pub const TRAVERSAL_FACTOR: usize = 10;

/// Consecutive rejected samples before queue building gives up
pub const MAX_QUEUE_REJECTIONS: usize = 50_000;

/// Thresholds closer than this to zero disable distance falloff
pub const DISTANCE_THRESHOLD_TOLERANCE: f64 = 0.1;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_dungeon";
/// Pixels per tile edge in exported images
pub const TILE_PIXELS: u32 = 8;
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 120;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;
