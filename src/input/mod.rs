//! Pointer input shared across providers.
//!
//! Provider SDKs deliver clicks, moves and drags in their own shapes; the
//! [`InputNormalizer`] turns them into one [`NormalizedEvent`] per named
//! [`Channel`] before they reach the measure modes.

pub mod events;
pub mod normalizer;

pub use events::{Channel, DomEvent, MouseButton, NormalizedEvent, ScreenPoint};
pub use normalizer::{InputNormalizer, RawPointerEvent, normalize_event};
