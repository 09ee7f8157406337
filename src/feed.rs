use std::io::BufRead;

use anyhow::Result;
use serde::Deserialize;

use crate::player::{PlayerControl, ScriptedPlayer};
use crate::types::{InstanceId, PlayerSnapshot, WidgetAction};
use crate::widget::{ArtworkTask, WidgetManager};

/// One line of the newline-delimited JSON event feed
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// Player state changed; starts a session if there was none
    Snapshot(PlayerSnapshot),
    SessionEnded,
    Action { action: String },
    /// Host asks for specific instances to be redrawn
    Update { ids: Vec<InstanceId> },
}

/// Drives a [`WidgetManager`] from a feed, standing in for the player and the OS.
///
/// The scripted player does not broadcast changes on its own, so every player
/// command is followed by a metadata refresh.
pub struct EventFeed<'a> {
    manager: &'a WidgetManager,
    player: &'a ScriptedPlayer,
    session_active: bool,
    pending: Vec<ArtworkTask>,
}

impl<'a> EventFeed<'a> {
    pub fn new(manager: &'a WidgetManager, player: &'a ScriptedPlayer) -> Self {
        Self {
            manager,
            player,
            session_active: false,
            pending: Vec::new(),
        }
    }

    fn session(&self) -> Option<&dyn PlayerControl> {
        if self.session_active {
            Some(self.player)
        } else {
            None
        }
    }

    /// Read until EOF. Malformed lines are logged and skipped.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            log::debug!("Feed: {}", line);

            match serde_json::from_str::<FeedMessage>(&line) {
                Ok(message) => self.handle_message(message),
                Err(e) => log::error!("Failed to parse feed message: {} - {}", e, line),
            }
        }

        log::info!("Event feed closed");
        Ok(())
    }

    pub fn handle_message(&mut self, message: FeedMessage) {
        let tasks = match message {
            FeedMessage::Snapshot(snapshot) => {
                log::debug!(
                    "Now playing: {} - {}",
                    snapshot.title.as_deref().unwrap_or("?"),
                    snapshot.artist.as_deref().unwrap_or("?")
                );
                self.player.set_snapshot(snapshot);
                self.session_active = true;
                self.manager
                    .dispatch(WidgetAction::MetadataChanged, self.session())
            }
            FeedMessage::SessionEnded => {
                log::info!("Player session ended");
                self.player.clear();
                self.session_active = false;
                self.manager
                    .dispatch(WidgetAction::MetadataChanged, self.session())
            }
            FeedMessage::Action { action } => {
                let mut tasks = self.manager.dispatch_token(&action, self.session());
                let is_command = WidgetAction::from_token(&action)
                    .map_or(false, |a| !a.is_refresh() && a != WidgetAction::OpenApp);
                if is_command {
                    tasks.extend(
                        self.manager
                            .dispatch(WidgetAction::MetadataChanged, self.session()),
                    );
                }
                tasks
            }
            FeedMessage::Update { ids } => self.manager.on_update(&ids, self.session()),
        };

        self.pending.retain(|task| !task.is_finished());
        self.pending.extend(tasks);
    }

    /// Artwork tasks that may still be running
    pub fn take_pending(&mut self) -> Vec<ArtworkTask> {
        std::mem::take(&mut self.pending)
    }
}
