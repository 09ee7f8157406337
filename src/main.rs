use std::sync::Arc;

use anyhow::{Context, Result};

use tunewidget::feed::EventFeed;
use tunewidget::{
    Compositor, DefaultArtworkLoader, PngDirectoryDisplay, ScriptedPlayer, WidgetConfig,
    WidgetManager,
};

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting widget host");

    if let Err(e) = run() {
        log::error!("Widget host failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = WidgetConfig::from_env();

    // Artwork fetches run here; events are handled on the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start background runtime")?;

    let compositor = Arc::new(Compositor::new(config.font_path.as_deref()));
    let loader = Arc::new(
        DefaultArtworkLoader::new(config.artwork_timeout)
            .context("Failed to create artwork loader")?,
    );
    let display = Arc::new(PngDirectoryDisplay::new(
        &config.output_dir,
        config.instances.clone(),
    )?);

    log::info!(
        "Rendering {} widget(s) into {}",
        config.instances.len(),
        config.output_dir.display()
    );

    let manager = WidgetManager::new(&config, compositor, display, loader, runtime.handle().clone());
    let player = ScriptedPlayer::new();

    // Initial draw, as the host does when widgets are first placed
    let mut feed = EventFeed::new(&manager, &player);
    feed.handle_message(tunewidget::feed::FeedMessage::Update {
        ids: config.instances.clone(),
    });

    let stdin = std::io::stdin();
    feed.run(stdin.lock())?;

    // Let in-flight artwork land before exiting
    let pending = feed.take_pending();
    runtime.block_on(async {
        for task in pending {
            if let Err(e) = task.await {
                log::warn!("Artwork task did not complete: {}", e);
            }
        }
    });

    Ok(())
}
