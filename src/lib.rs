#![forbid(unsafe_code)]

pub mod avatar;
pub mod compose;
pub mod error;
pub mod layout;
pub mod style;

pub use avatar::{AVATAR_SIZE, AcquiredAvatar, AvatarSource, circular_mask};
pub use compose::{CANVAS_HEIGHT, CANVAS_WIDTH, Composer, Quote};
pub use error::{CitgenError, CitgenResult};
pub use layout::{LayoutParams, MAX_QUOTE_CHARS, select_layout, wrap_quote};
pub use style::QuoteStyle;
