use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    Res,
    config::Settings,
    errors::Error,
    info, server,
    types::{AppState, RunStatus, ShuffleReport, ShuffleTableRow},
    warning,
};

/// Runs one complete shuffle through the browser login flow.
///
/// Starts the local server, sends the user to the login route and waits for
/// the randomize route to record a status. The server task is left running and
/// ends together with the process.
///
/// # Arguments
///
/// * `settings` - Loaded configuration; `playlist_ids` must not be empty
/// * `no_browser` - Print the login URL instead of opening a browser
///
/// # Returns
///
/// - `Ok(reports)` - One report per shuffled playlist, in order
/// - `Err(Error::Run)` - The run failed on the server side
/// - `Err(Error::Auth)` - Login was denied or did not happen in time
///
/// # Example
///
/// ```
/// let settings = config::Settings::from_env()?;
/// let reports = cli::shuffle(settings, false).await?;
/// cli::print_reports(&reports);
/// ```
pub async fn shuffle(settings: Settings, no_browser: bool) -> Res<Vec<ShuffleReport>> {
    if settings.playlist_ids.is_empty() {
        return Err(Error::Config(
            "no playlists configured; pass --playlist or set SHUFFLE_PLAYLIST_IDS".to_string(),
        ));
    }

    let state = Arc::new(AppState::new(&settings));

    let listener = server::bind(&settings.server_addr).await?;
    let login_url = format!("http://{}/", listener.local_addr()?);

    let server_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = server::start_api_server(listener, server_state).await {
            warning!("Local server stopped: {}", e);
        }
    });

    info!(
        "Shuffling {} playlist(s): {}",
        settings.playlist_ids.len(),
        settings.playlist_ids.join(", ")
    );

    if no_browser {
        info!("Open the following URL to log in with Spotify:\n{}", login_url);
    } else if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    let outcome = wait_for_outcome(&state, settings.poll_interval, settings.login_timeout).await;

    match outcome {
        Some(RunStatus::Finished(reports)) => Ok(reports),
        Some(RunStatus::Failed(reason)) => Err(Error::Run(reason)),
        None => Err(Error::Auth(format!(
            "no login completed within {} seconds",
            settings.login_timeout.as_secs()
        ))),
    }
}

/// Polls the shared run status until it is set.
///
/// Checks every `interval`. Returns `None` if nobody logged in within
/// `login_timeout`; once logged in, the run itself is not timed.
pub async fn wait_for_outcome(
    state: &AppState,
    interval: Duration,
    login_timeout: Duration,
) -> Option<RunStatus> {
    let start = Instant::now();
    let pb = spinner("Waiting for Spotify login...");
    let mut announced_run = false;

    loop {
        if let Some(status) = state.current_status().await {
            pb.finish_and_clear();
            return Some(status);
        }

        if state.is_authorized() {
            if !announced_run {
                pb.set_message("Shuffling playlists...");
                announced_run = true;
            }
        } else if start.elapsed() >= login_timeout {
            pb.finish_and_clear();
            return None;
        }

        tokio::time::sleep(interval).await;
    }
}

pub fn print_reports(reports: &[ShuffleReport]) {
    let rows: Vec<ShuffleTableRow> = reports.iter().map(ShuffleTableRow::from).collect();
    println!("{}", Table::new(rows));
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
