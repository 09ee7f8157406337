use parking_lot::RwLock;

use crate::types::PlayerSnapshot;

/// Commands and reads the widget needs from an active playback session.
///
/// Commands are fire-and-forget. Callers hold an `Option<&dyn PlayerControl>`;
/// `None` means there is no session and every command is skipped.
pub trait PlayerControl: Send + Sync {
    fn toggle_play_pause(&self);
    fn seek_to_previous(&self);
    fn seek_to_next(&self);
    fn toggle_shuffle(&self);
    fn toggle_like(&self);
    fn toggle_lyrics(&self);

    fn current_snapshot(&self) -> Option<PlayerSnapshot>;

    fn is_current_song_liked(&self) -> bool {
        self.current_snapshot().map_or(false, |s| s.is_liked)
    }

    fn next_song_title(&self) -> Option<String> {
        self.current_snapshot().and_then(|s| s.next_track_title)
    }
}

/// In-memory session driven by an external feed.
///
/// Toggles are applied to the held snapshot so the next refresh shows them;
/// seeking and lyrics are only logged since there is no queue here.
#[derive(Default)]
pub struct ScriptedPlayer {
    snapshot: RwLock<Option<PlayerSnapshot>>,
    lyrics_visible: RwLock<bool>,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_snapshot(&self, snapshot: PlayerSnapshot) {
        *self.snapshot.write() = Some(snapshot);
    }

    pub fn clear(&self) {
        *self.snapshot.write() = None;
    }

    pub fn lyrics_visible(&self) -> bool {
        *self.lyrics_visible.read()
    }

    fn update<F: FnOnce(&mut PlayerSnapshot)>(&self, f: F) {
        if let Some(snapshot) = self.snapshot.write().as_mut() {
            f(snapshot);
        }
    }
}

impl PlayerControl for ScriptedPlayer {
    fn toggle_play_pause(&self) {
        self.update(|s| s.is_playing = !s.is_playing);
    }

    fn seek_to_previous(&self) {
        log::info!("Seek to previous requested");
        self.update(|s| s.position_ms = 0);
    }

    fn seek_to_next(&self) {
        log::info!("Seek to next requested");
        self.update(|s| {
            if let Some(next) = s.next_track_title.take() {
                s.title = Some(next);
                s.position_ms = 0;
            }
        });
    }

    fn toggle_shuffle(&self) {
        self.update(|s| s.shuffle_enabled = !s.shuffle_enabled);
    }

    fn toggle_like(&self) {
        self.update(|s| s.is_liked = !s.is_liked);
    }

    fn toggle_lyrics(&self) {
        let mut visible = self.lyrics_visible.write();
        *visible = !*visible;
        log::info!("Lyrics {}", if *visible { "shown" } else { "hidden" });
    }

    fn current_snapshot(&self) -> Option<PlayerSnapshot> {
        self.snapshot.read().clone()
    }
}
