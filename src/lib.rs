//! Home-screen "now playing" widget logic: projects player state into a view model,
//! draws fallback avatars for missing artwork, and fetches real artwork in the background.

pub mod action;
pub mod artwork;
pub mod compositor;
pub mod config;
pub mod display;
pub mod feed;
pub mod player;
pub mod projection;
pub mod state;
pub mod types;
pub mod widget;

pub use artwork::{ArtworkError, ArtworkLoader, DefaultArtworkLoader};
pub use compositor::{AvatarImage, Compositor, AVATAR_SIZE};
pub use config::{Placeholders, WidgetConfig};
pub use display::{DisplaySurface, PngDirectoryDisplay};
pub use player::{PlayerControl, ScriptedPlayer};
pub use projection::project;
pub use types::{
    Control, InstanceId, LikeIcon, PlayPauseIcon, PlayerSnapshot, RefreshState, ShuffleIcon,
    WidgetAction, WidgetViewModel,
};
pub use widget::{ArtworkTask, WidgetManager};
