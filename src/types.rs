use serde::{Deserialize, Serialize};

/// Stable numeric id of one placed widget.
pub type InstanceId = u32;

/// Read-only view of the player at the moment of a refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSnapshot {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub artwork_ref: Option<String>,
    pub duration_ms: i64,
    pub position_ms: i64,
    pub is_playing: bool,
    pub shuffle_enabled: bool,
    pub is_liked: bool,
    pub next_track_title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayPauseIcon {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleIcon {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeIcon {
    Liked,
    Unliked,
}

/// Everything the display needs to draw one widget, minus the artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetViewModel {
    pub title_text: String,
    pub artist_text: String,
    pub progress_percent: u8,
    pub play_pause: PlayPauseIcon,
    pub shuffle: ShuffleIcon,
    pub like: LikeIcon,
    pub next_up_text: String,
}

/// Inbound named actions. The set is closed; anything else is dropped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetAction {
    PlayPause,
    Previous,
    Next,
    Shuffle,
    Like,
    Lyrics,
    OpenApp,
    MetadataChanged,
    ProgressTick,
}

/// Tappable regions of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    PlayPause,
    Previous,
    Next,
    Shuffle,
    Like,
    Lyrics,
    Root,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::PlayPause,
        Control::Previous,
        Control::Next,
        Control::Shuffle,
        Control::Like,
        Control::Lyrics,
        Control::Root,
    ];

    /// The action a tap on this control sends back to the dispatcher
    pub fn action(self) -> WidgetAction {
        match self {
            Control::PlayPause => WidgetAction::PlayPause,
            Control::Previous => WidgetAction::Previous,
            Control::Next => WidgetAction::Next,
            Control::Shuffle => WidgetAction::Shuffle,
            Control::Like => WidgetAction::Like,
            Control::Lyrics => WidgetAction::Lyrics,
            Control::Root => WidgetAction::OpenApp,
        }
    }
}

/// Per-instance refresh lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
    Rendered,
    RenderedWithPendingArtwork,
}
