use crate::types::WidgetAction;

impl WidgetAction {
    /// Parse a wire token.
    ///
    /// Accepts the snake_case names (`play_pause`) and the broadcast-style names
    /// (`ACTION_PLAY_PAUSE`), the latter optionally behind a dotted namespace
    /// such as `com.example.player.ACTION_NEXT`. Anything else is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        let name = match token.rsplit_once('.') {
            Some((_, last)) if last.starts_with("ACTION_") => last,
            _ => token,
        };

        let action = match name {
            "play_pause" | "ACTION_PLAY_PAUSE" => WidgetAction::PlayPause,
            "previous" | "ACTION_PREV" => WidgetAction::Previous,
            "next" | "ACTION_NEXT" => WidgetAction::Next,
            "shuffle" | "ACTION_SHUFFLE" => WidgetAction::Shuffle,
            "like" | "ACTION_LIKE" => WidgetAction::Like,
            "lyrics" | "ACTION_LYRICS" => WidgetAction::Lyrics,
            "open_app" | "ACTION_OPEN_APP" => WidgetAction::OpenApp,
            "metadata_changed" | "ACTION_METADATA_CHANGED" => WidgetAction::MetadataChanged,
            "progress_tick" | "ACTION_UPDATE_PROGRESS" => WidgetAction::ProgressTick,
            _ => return None,
        };
        Some(action)
    }

    pub fn token(self) -> &'static str {
        match self {
            WidgetAction::PlayPause => "play_pause",
            WidgetAction::Previous => "previous",
            WidgetAction::Next => "next",
            WidgetAction::Shuffle => "shuffle",
            WidgetAction::Like => "like",
            WidgetAction::Lyrics => "lyrics",
            WidgetAction::OpenApp => "open_app",
            WidgetAction::MetadataChanged => "metadata_changed",
            WidgetAction::ProgressTick => "progress_tick",
        }
    }

    /// Whether this action asks for a redraw rather than a player command
    pub fn is_refresh(self) -> bool {
        matches!(self, WidgetAction::MetadataChanged | WidgetAction::ProgressTick)
    }
}
