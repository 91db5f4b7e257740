//! Command implementations

use tokio::io::{AsyncWriteExt, BufReader};
use tracing::info;

use crate::app::AppContainer;
use crate::cli::args::{ClipArgs, InfoArgs};
use crate::config_initialization::ClientSettings;
use crate::error::AppResult;
use crate::presenter::CLIP_FALLBACK_MESSAGE;
use crate::session::interactive::InteractiveSession;
use crate::session::{ClipForm, ClipperSession};

/// Execute the info command; returns whether the fetch succeeded
pub async fn info(
    container: &dyn AppContainer,
    settings: &ClientSettings,
    args: InfoArgs,
) -> AppResult<bool> {
    info!("Starting metadata lookup");

    let mut session = ClipperSession::new(settings.discard_stale_responses);
    session.form.url = args.url;
    session.check(&container.metadata_resolver()).await;

    print(&settings.output_format.render(&session.metadata)?).await?;
    Ok(session.metadata.status.is_success())
}

/// Execute the clip command; returns whether the clip (and optional download) succeeded
pub async fn clip(
    container: &dyn AppContainer,
    settings: &ClientSettings,
    args: ClipArgs,
) -> AppResult<bool> {
    info!("Starting clip request");

    let mut session = ClipperSession::new(settings.discard_stale_responses);
    session.form = ClipForm {
        url: args.url,
        quality: args.quality,
        start_time: args.start,
        end_time: args.end,
    };
    let requester = container.clip_requester();
    session.submit(&requester).await;

    print(&settings.output_format.render(&session.clip)?).await?;

    let Some(result) = session.clip.visible_result() else {
        return Ok(false);
    };

    if let Some(path) = args.output {
        match requester.save(result, &path).await {
            Ok(bytes) => {
                print(&format!("Enregistré: {} ({} octets)\n", path.display(), bytes)).await?
            }
            Err(err) => {
                print(&format!("✖ {}\n", err.user_message(CLIP_FALLBACK_MESSAGE))).await?;
                return Ok(false);
            }
        }
    }

    Ok(true)
}

/// Execute the interactive session command over stdin/stdout
pub async fn session(container: &dyn AppContainer, settings: &ClientSettings) -> AppResult<bool> {
    info!("Starting interactive session");

    let mut interactive = InteractiveSession::new(
        container,
        ClipperSession::new(settings.discard_stale_responses),
        settings.output_format,
    );
    let mut stdout = tokio::io::stdout();
    interactive
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;
    Ok(true)
}

async fn print(text: &str) -> AppResult<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
