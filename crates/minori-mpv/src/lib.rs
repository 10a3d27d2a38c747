mod app;
mod keys;
mod prompt;

use std::os::raw::c_int;
use std::path::Path;

use mpv_client::{mpv_handle, Event, Handle};
use tracing_subscriber::EnvFilter;

use minori_core::config::Config;

use crate::app::App;

/// mpv C plugin entry point.
#[no_mangle]
pub extern "C" fn mpv_open_cplugin(handle: *mut mpv_handle) -> c_int {
    let result = std::panic::catch_unwind(|| {
        let client = Handle::from_ptr(handle);
        run(client)
    });
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("minori: plugin panicked: {err:?}");
            -1
        }
    }
}

fn run(client: &mut Handle) -> c_int {
    let state_dir = match Config::ensure_state_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("minori: cannot create state directory: {e}");
            return -1;
        }
    };
    init_logging(&state_dir);
    tracing::info!(client = client.name(), "minori plugin loaded");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "config rejected, using defaults");
            let _ = client.command(&[
                "show-text",
                &format!("minori: config rejected ({e}), using defaults"),
                "5000",
            ]);
            Config::default()
        }
    };

    let mut app = App::new(client.name().to_string(), config, state_dir);
    app.startup(client);

    loop {
        match client.wait_event(1.0) {
            Event::Shutdown => {
                tracing::info!("shutting down");
                return 0;
            }
            Event::StartFile(_) => app.on_start_file(),
            Event::FileLoaded => app.on_file_loaded(client),
            Event::EndFile(_) => app.on_end_file(client),
            Event::ClientMessage(msg) => {
                let args: Vec<String> = msg.args().iter().map(|a| a.to_string()).collect();
                app.on_client_message(client, &args);
            }
            Event::None => app.tick(client),
            _ => app.tick(client),
        }
    }
}

/// Log to a file in the state directory; a player plugin owns no terminal.
/// `MINORI_LOG` overrides the filter, e.g. `MINORI_LOG=minori_core=debug`.
fn init_logging(state_dir: &Path) {
    let appender = tracing_appender::rolling::never(state_dir, "minori.log");
    let filter = EnvFilter::try_from_env("MINORI_LOG")
        .unwrap_or_else(|_| EnvFilter::new("minori=info,minori_core=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .try_init();
}
