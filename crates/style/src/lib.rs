pub mod border;
pub mod breaks;
pub mod font;
pub mod keep;
pub mod margins;
pub mod parsers;
pub mod serde_length;
pub mod space;
pub mod text;

pub use border::{Border, BorderModel, BorderPadding, BorderStyle, CondLength, Conditionality};
pub use breaks::BreakClass;
pub use font::{FontSpec, FontStyle, FontWeight};
pub use keep::{Keep, KeepContext, KeepProperty, KeepValue};
pub use margins::Margins;
pub use parsers::StyleParseError;
pub use space::{LengthRange, SpaceSpec};
pub use text::TextAlign;

/// Penalty value that forbids a break; its negation forces one.
pub const INFINITE: i32 = 1000;
