use std::io::Cursor;
use std::sync::Arc;

use tunewidget::display::RenderedWidget;
use tunewidget::feed::EventFeed;
use tunewidget::{
    ArtworkError, ArtworkLoader, Compositor, LikeIcon, PlayPauseIcon, PngDirectoryDisplay,
    ScriptedPlayer, WidgetConfig, WidgetManager,
};

struct NoArtwork;

impl ArtworkLoader for NoArtwork {
    fn load(&self, reference: &str) -> Result<Vec<u8>, ArtworkError> {
        Err(ArtworkError::Unsupported(reference.to_string()))
    }
}

fn read_widget(display: &PngDirectoryDisplay, id: u32) -> RenderedWidget {
    serde_json::from_slice(&std::fs::read(display.view_path(id)).unwrap()).unwrap()
}

#[tokio::test]
async fn test_feed_drives_widgets() {
    let dir = tempfile::tempdir().unwrap();
    let config = WidgetConfig {
        output_dir: dir.path().to_path_buf(),
        instances: vec![1, 2],
        ..WidgetConfig::default()
    };
    let display = Arc::new(PngDirectoryDisplay::new(dir.path(), config.instances.clone()).unwrap());
    let manager = WidgetManager::new(
        &config,
        Arc::new(Compositor::without_font()),
        display.clone(),
        Arc::new(NoArtwork),
        tokio::runtime::Handle::current(),
    );
    let player = ScriptedPlayer::new();

    let input = [
        r#"{"type":"snapshot","title":"Don't Stop Me Now","artist":"Queen","artwork_ref":"content://art/9","duration_ms":209000,"position_ms":104500,"is_playing":true}"#,
        "this line is not json",
        r#"{"type":"action","action":"ACTION_PLAY_PAUSE"}"#,
        r#"{"type":"action","action":"like"}"#,
        r#"{"type":"action","action":"ACTION_SELF_DESTRUCT"}"#,
    ]
    .join("\n");

    let mut feed = EventFeed::new(&manager, &player);
    feed.run(Cursor::new(input)).unwrap();
    for task in feed.take_pending() {
        task.await.unwrap();
    }

    for id in [1, 2] {
        let widget = read_widget(&display, id);
        assert_eq!(widget.view.title_text, "Don't Stop Me Now");
        assert_eq!(widget.view.progress_percent, 50);
        assert_eq!(widget.view.play_pause, PlayPauseIcon::Play);
        assert_eq!(widget.view.like, LikeIcon::Liked);

        // Unsupported artwork reference fell back to the avatar
        let png = image::open(display.artwork_path(id)).unwrap().to_rgba8();
        assert_eq!(png, Compositor::without_font().render_avatar("Queen").image);
    }

    feed.run(Cursor::new(r#"{"type":"session_ended"}"#)).unwrap();
    let widget = read_widget(&display, 1);
    assert_eq!(widget.view.title_text, "song title");
    assert_eq!(widget.view.progress_percent, 0);
}
