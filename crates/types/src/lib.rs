pub mod color;
pub mod geometry;
pub mod ids;
pub mod min_opt_max;

pub use color::Color;
pub use geometry::{Length, Rect, Size};
pub use ids::{FoId, ResourceUri};
pub use min_opt_max::MinOptMax;
