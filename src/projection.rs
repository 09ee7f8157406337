use crate::config::Placeholders;
use crate::types::{LikeIcon, PlayPauseIcon, PlayerSnapshot, ShuffleIcon, WidgetViewModel};

/// Map the current snapshot (if any) to what the widget should show.
///
/// Total and pure: no I/O, no panics, same input gives the same output.
pub fn project(snapshot: Option<&PlayerSnapshot>, placeholders: &Placeholders) -> WidgetViewModel {
    let Some(snapshot) = snapshot else {
        return WidgetViewModel {
            title_text: placeholders.title.clone(),
            artist_text: placeholders.artist.clone(),
            progress_percent: 0,
            play_pause: PlayPauseIcon::Play,
            shuffle: ShuffleIcon::Off,
            like: LikeIcon::Unliked,
            next_up_text: String::new(),
        };
    };

    WidgetViewModel {
        title_text: snapshot
            .title
            .clone()
            .unwrap_or_else(|| placeholders.title.clone()),
        artist_text: snapshot
            .artist
            .clone()
            .unwrap_or_else(|| placeholders.artist.clone()),
        progress_percent: progress_percent(snapshot.position_ms, snapshot.duration_ms),
        play_pause: if snapshot.is_playing {
            PlayPauseIcon::Pause
        } else {
            PlayPauseIcon::Play
        },
        shuffle: if snapshot.shuffle_enabled {
            ShuffleIcon::On
        } else {
            ShuffleIcon::Off
        },
        like: if snapshot.is_liked {
            LikeIcon::Liked
        } else {
            LikeIcon::Unliked
        },
        next_up_text: next_up_text(snapshot.next_track_title.as_deref()),
    }
}

/// `round(position * 100 / duration)` clamped to 0..=100; 0 for non-positive durations.
pub fn progress_percent(position_ms: i64, duration_ms: i64) -> u8 {
    if duration_ms <= 0 {
        return 0;
    }
    // i128 so that position * 100 cannot overflow
    let position = i128::from(position_ms.max(0));
    let duration = i128::from(duration_ms);
    let rounded = (position * 100 + duration / 2) / duration;
    rounded.clamp(0, 100) as u8
}

fn next_up_text(next_title: Option<&str>) -> String {
    next_title
        .map(|title| format!("Next: {}", title))
        .unwrap_or_default()
}
