use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::artwork::{ArtworkError, ArtworkLoader};
use crate::compositor::Compositor;
use crate::config::{Placeholders, WidgetConfig};
use crate::display::DisplaySurface;
use crate::player::PlayerControl;
use crate::projection::project;
use crate::state::{self, SharedState};
use crate::types::{InstanceId, PlayerSnapshot, RefreshState, WidgetAction};

/// A background artwork fetch. Awaiting it is optional; dropping it detaches the task.
pub type ArtworkTask = JoinHandle<()>;

/// Turns actions into player commands and redraws widget instances.
///
/// Refreshes run on the caller's thread. Only artwork work goes to the runtime.
/// Overlapping refreshes of one instance are not coalesced and a stale fetch may
/// land after a newer one; the display keeps whichever write came last, but only
/// the latest refresh's fetch moves the instance to `Rendered`.
pub struct WidgetManager {
    compositor: Arc<Compositor>,
    display: Arc<dyn DisplaySurface>,
    loader: Arc<dyn ArtworkLoader>,
    runtime: Handle,
    placeholders: Placeholders,
    artwork_timeout: Duration,
    state: SharedState,
}

impl WidgetManager {
    pub fn new(
        config: &WidgetConfig,
        compositor: Arc<Compositor>,
        display: Arc<dyn DisplaySurface>,
        loader: Arc<dyn ArtworkLoader>,
        runtime: Handle,
    ) -> Self {
        Self {
            compositor,
            display,
            loader,
            runtime,
            placeholders: config.placeholders.clone(),
            artwork_timeout: config.artwork_timeout,
            state: state::create_state(),
        }
    }

    pub fn state(&self, id: InstanceId) -> RefreshState {
        state::state_of(&self.state, id)
    }

    /// Parse and handle a wire token. Unknown tokens are dropped.
    pub fn dispatch_token(
        &self,
        token: &str,
        session: Option<&dyn PlayerControl>,
    ) -> Vec<ArtworkTask> {
        match WidgetAction::from_token(token) {
            Some(action) => self.dispatch(action, session),
            None => {
                log::debug!("Ignoring unknown widget action: {:?}", token);
                Vec::new()
            }
        }
    }

    pub fn dispatch(
        &self,
        action: WidgetAction,
        session: Option<&dyn PlayerControl>,
    ) -> Vec<ArtworkTask> {
        log::debug!("Widget action: {}", action.token());

        match action {
            WidgetAction::OpenApp => {
                if let Err(e) = self.display.open_foreground_player() {
                    log::error!("Failed to open player: {:#}", e);
                }
                Vec::new()
            }
            WidgetAction::MetadataChanged | WidgetAction::ProgressTick => {
                self.refresh_all(session)
            }
            command => {
                match session {
                    Some(player) => Self::forward(command, player),
                    None => log::debug!("No active session, dropping {}", command.token()),
                }
                Vec::new()
            }
        }
    }

    fn forward(command: WidgetAction, player: &dyn PlayerControl) {
        match command {
            WidgetAction::PlayPause => player.toggle_play_pause(),
            WidgetAction::Previous => player.seek_to_previous(),
            WidgetAction::Next => player.seek_to_next(),
            WidgetAction::Shuffle => player.toggle_shuffle(),
            WidgetAction::Like => player.toggle_like(),
            WidgetAction::Lyrics => player.toggle_lyrics(),
            WidgetAction::OpenApp | WidgetAction::MetadataChanged | WidgetAction::ProgressTick => {}
        }
    }

    /// Redraw every instance the display reports as placed
    pub fn refresh_all(&self, session: Option<&dyn PlayerControl>) -> Vec<ArtworkTask> {
        let ids = self.display.active_instance_ids();
        self.on_update(&ids, session)
    }

    /// Redraw the given instances, e.g. when the host asks for an update
    pub fn on_update(
        &self,
        ids: &[InstanceId],
        session: Option<&dyn PlayerControl>,
    ) -> Vec<ArtworkTask> {
        ids.iter()
            .filter_map(|&id| self.refresh(id, session))
            .collect()
    }

    /// Full redraw of one instance. Returns the artwork task if a fetch was started.
    pub fn refresh(&self, id: InstanceId, session: Option<&dyn PlayerControl>) -> Option<ArtworkTask> {
        let generation = state::begin_refresh(&self.state, id);

        let snapshot = Self::read_snapshot(session);
        let view = project(snapshot.as_ref(), &self.placeholders);

        let (artist, artwork_ref) = match snapshot {
            Some(snapshot) => (
                snapshot.artist.unwrap_or_default(),
                snapshot.artwork_ref.filter(|r| !r.trim().is_empty()),
            ),
            None => (String::new(), None),
        };

        match artwork_ref {
            None => {
                let avatar = self.compositor.render_avatar(&artist);
                if let Err(e) = self.display.render_full(id, &view, Some(&avatar.image)) {
                    log::error!("Failed to render widget {}: {:#}", id, e);
                }
                state::settle(&self.state, id, generation, RefreshState::Rendered);
                None
            }
            Some(reference) => {
                if let Err(e) = self.display.render_full(id, &view, None) {
                    log::error!("Failed to render widget {}: {:#}", id, e);
                }
                state::settle(
                    &self.state,
                    id,
                    generation,
                    RefreshState::RenderedWithPendingArtwork,
                );
                Some(self.spawn_artwork(id, generation, reference, artist))
            }
        }
    }

    fn read_snapshot(session: Option<&dyn PlayerControl>) -> Option<PlayerSnapshot> {
        let player = session?;
        let mut snapshot = player.current_snapshot()?;
        snapshot.is_liked = player.is_current_song_liked();
        snapshot.next_track_title = player.next_song_title();
        Some(snapshot)
    }

    fn spawn_artwork(
        &self,
        id: InstanceId,
        generation: u64,
        reference: String,
        artist: String,
    ) -> ArtworkTask {
        let compositor = self.compositor.clone();
        let loader = self.loader.clone();
        let display = self.display.clone();
        let states = self.state.clone();
        let timeout = self.artwork_timeout;

        self.runtime.spawn(async move {
            let fetch = {
                let compositor = compositor.clone();
                let reference = reference.clone();
                tokio::task::spawn_blocking(move || -> Result<RgbaImage, ArtworkError> {
                    let bytes = loader.load(&reference)?;
                    compositor.decode_and_resize_artwork(&bytes)
                })
            };

            let result = match tokio::time::timeout(timeout, fetch).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => Err(ArtworkError::Task(e.to_string())),
                Err(_) => Err(ArtworkError::Timeout(timeout)),
            };

            // Avatar drawing, encoding and display I/O stay off the async workers
            let apply = tokio::task::spawn_blocking(move || {
                let artwork = match result {
                    Ok(image) => image,
                    Err(e) => {
                        log::warn!("Artwork for widget {} unavailable ({}): {}", id, reference, e);
                        compositor.render_avatar(&artist).image
                    }
                };

                if let Err(e) = display.render_partial(id, &artwork) {
                    log::error!("Failed to update artwork of widget {}: {:#}", id, e);
                }
                state::settle(&states, id, generation, RefreshState::Rendered);
            });

            if let Err(e) = apply.await {
                log::error!("Artwork update of widget {} did not complete: {}", id, e);
            }
        })
    }
}
