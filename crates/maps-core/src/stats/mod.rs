pub mod moments;
pub mod trend;

pub use moments::{compute_noise, compute_offset, mean_std, temporal_noise};
pub use trend::{frame_mean_trend, smooth_clamped};
