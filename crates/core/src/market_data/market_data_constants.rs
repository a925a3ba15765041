/// Intraday range factor: high/low are widened away from open/close by up to
/// this fraction times a standard-normal draw.
pub const INTRADAY_RANGE_FACTOR: f64 = 0.02;

/// Base daily volume before jitter and move scaling.
pub const BASE_VOLUME: i64 = 10_000_000;

/// Uniform random volume jitter added on top of the base, exclusive upper bound.
pub const VOLUME_JITTER: i64 = 5_000_000;

/// Volume multiplier per unit of absolute daily log-return.
pub const VOLUME_MOVE_MULTIPLIER: f64 = 10.0;

/// Default span of generated history, in years.
pub const DEFAULT_HISTORY_YEARS: u32 = 10;
