//! Playback: audio transport, wall-clock position and repeat sections.

pub mod clock;
pub mod player;
pub mod repeat;
pub mod transport;

pub use clock::PlaybackClock;
pub use player::{Player, TickEvent};
pub use repeat::{RepeatSection, RepeatState};
pub use transport::{RodioTransport, Transport};
