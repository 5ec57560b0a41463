//! MPRIS module: a media surface backed by a desktop player on the session bus.

pub mod connection;
pub mod events;
pub mod metadata;
pub mod playback;
pub mod surface;

pub use connection::select_player;
pub use surface::MprisSurface;
