//! Capabilities layout consumes from the outside: font metrics and image
//! sizes. Both come with simple in-process implementations.

pub mod image;
pub mod metrics;

pub use image::{ImageLoader, InMemoryImageLoader, ResourceError};
pub use metrics::{FixedWidthMetrics, FontMetricsProvider, MetricsError};
