use std::path::PathBuf;

use mpv_client::Handle;

use minori_core::auth::{self, AuthState};
use minori_core::config::Config;
use minori_core::envelope::Envelope;
use minori_core::progress::{self, ReportOutcome, Reporter};
use minori_core::search::{self, SearchSession};
use minori_core::{sidecar, token, Helper};

use crate::keys;
use crate::prompt::{Prompt, PromptEvent};

/// How long prompt OSD text stays up between keystrokes, in ms.
const PROMPT_OSD_MS: &str = "60000";
/// Duration of transient notices, in ms.
const NOTICE_OSD_MS: &str = "4000";

/// Plugin state and event handlers.
///
/// Everything runs on the player's script thread; helper invocations block
/// the handler that issued them until the subprocess exits.
pub struct App {
    client_name: String,
    config: Config,
    state_dir: PathBuf,
    helper: Helper,
    reporter: Reporter,
    authorized: bool,
    playing: Option<Playing>,
    prompt: Option<ActivePrompt>,
}

/// Snapshot of the file currently loaded, refreshed on timeout ticks.
/// mpv tears playback properties down before `EndFile` reaches the client,
/// so the reporter consumes the last snapshot instead.
struct Playing {
    path: String,
    dir: PathBuf,
    position: f64,
    duration: f64,
}

struct ActivePrompt {
    prompt: Prompt,
    kind: PromptKind,
}

enum PromptKind {
    Search { session: SearchSession, dir: PathBuf },
    Token,
    Score { path: String },
}

impl App {
    pub fn new(client_name: String, config: Config, state_dir: PathBuf) -> Self {
        let helper = Helper::new(config.helper.program.clone(), state_dir.clone());
        let reporter = Reporter::new(config.tracking.mark_threshold);
        Self {
            client_name,
            config,
            state_dir,
            helper,
            reporter,
            authorized: false,
            playing: None,
            prompt: None,
        }
    }

    /// Register the persistent bindings and run the auth gate once.
    ///
    /// A non-authorized outcome suppresses the automatic file-load
    /// resolver; the bindings stay usable and progress reporting keeps
    /// working.
    pub fn startup(&mut self, client: &mut Handle) {
        let bindings = keys::bindings_section_content(&self.client_name);
        let _ = client.command(&["define-section", keys::BINDINGS_SECTION, &bindings, "default"]);
        let _ = client.command(&["enable-section", keys::BINDINGS_SECTION]);

        match auth::check(&self.helper) {
            AuthState::Authorized => {
                self.authorized = true;
            }
            AuthState::NeedsToken(message) => {
                let label = format!("{message}\nPaste AniList token");
                self.open_prompt(client, Prompt::new(label, ""), PromptKind::Token);
            }
            AuthState::Failed(message) => {
                self.notice(client, &format!("AniList auth failed: {message}"));
            }
        }
    }

    /// Refresh the playback snapshot while a file is loaded.
    pub fn tick(&mut self, client: &mut Handle) {
        let Some(playing) = self.playing.as_mut() else {
            return;
        };
        if let Ok(position) = client.get_property::<f64>("time-pos") {
            playing.position = position;
        }
        if let Ok(duration) = client.get_property::<f64>("duration") {
            playing.duration = duration;
        }
    }

    pub fn on_start_file(&mut self) {
        self.playing = None;
    }

    pub fn on_file_loaded(&mut self, client: &mut Handle) {
        let Ok(path) = client.get_property::<String>("path") else {
            return;
        };
        let file = PathBuf::from(&path);
        if !file.starts_with(&self.config.tracking.anime_dir) {
            tracing::debug!(%path, "outside the tracked directory, ignoring");
            self.playing = None;
            return;
        }
        let Some(dir) = file.parent().map(PathBuf::from) else {
            return;
        };

        let duration = client.get_property::<f64>("duration").unwrap_or(0.0);
        self.playing = Some(Playing {
            path: path.clone(),
            dir: dir.clone(),
            position: 0.0,
            duration,
        });
        tracing::info!(%path, "tracked file loaded");

        if self.authorized && self.prompt.is_none() && search::needs_resolution(&dir) {
            self.begin_search(client, dir, &path);
        }
    }

    pub fn on_end_file(&mut self, client: &mut Handle) {
        let Some(playing) = self.playing.take() else {
            return;
        };
        let outcome = self.reporter.on_unload(
            &self.helper,
            &playing.path,
            playing.position,
            playing.duration,
        );
        match outcome {
            ReportOutcome::Reported => self.notice(client, "AniList: progress updated"),
            ReportOutcome::HelperFailed(message) => {
                self.notice(client, &format!("AniList helper failed: {message}"));
            }
            ReportOutcome::BelowThreshold
            | ReportOutcome::NoPosition
            | ReportOutcome::Rejected => {}
        }
    }

    pub fn on_client_message(&mut self, client: &mut Handle, args: &[String]) {
        let Some(command) = args.first() else {
            return;
        };
        match command.as_str() {
            "prompt-key" => {
                if let Some(key) = args.get(1) {
                    let key = key.clone();
                    self.on_prompt_key(client, &key);
                }
            }
            "minori-resolve" => self.force_resolve(client),
            "minori-score" => self.open_score(client),
            _ => {}
        }
    }

    /// Open the search prompt for the playing file's directory, existing
    /// sidecar or not. This is the only path that may overwrite one.
    fn force_resolve(&mut self, client: &mut Handle) {
        if self.prompt.is_some() {
            return;
        }
        let Some((dir, path)) = self
            .playing
            .as_ref()
            .map(|p| (p.dir.clone(), p.path.clone()))
        else {
            self.notice(client, "minori: no file playing");
            return;
        };
        self.begin_search(client, dir, &path);
    }

    fn open_score(&mut self, client: &mut Handle) {
        if self.prompt.is_some() {
            return;
        }
        let Some(path) = self.playing.as_ref().map(|p| p.path.clone()) else {
            self.notice(client, "minori: no file playing");
            return;
        };
        self.open_prompt(client, Prompt::new("Score", ""), PromptKind::Score { path });
    }

    fn begin_search(&mut self, client: &mut Handle, dir: PathBuf, path: &str) {
        let prefill = search::title_guess(&self.helper, path);
        let mut session = SearchSession::new();
        let mut prompt = Prompt::new("Anime title", prefill);
        match session.update(&self.helper, prompt.query()) {
            Ok(labels) => prompt.set_completions(labels.to_vec()),
            Err(e) => {
                tracing::warn!(error = %e, "initial search failed");
                self.notice(client, &format!("AniList helper failed: {e}"));
            }
        }
        self.open_prompt(client, prompt, PromptKind::Search { session, dir });
    }

    fn on_prompt_key(&mut self, client: &mut Handle, key: &str) {
        let event = match self.prompt.as_mut() {
            Some(active) => active.prompt.handle_key(key),
            None => return,
        };
        match event {
            PromptEvent::Changed => {
                self.refresh_completions();
                self.render_prompt(client);
            }
            PromptEvent::Moved | PromptEvent::Ignored => self.render_prompt(client),
            PromptEvent::Submitted(text) => {
                if let Some(active) = self.close_prompt(client) {
                    self.finish_prompt(client, active.kind, text);
                }
            }
            PromptEvent::Cancelled => {
                let cancelled = self.close_prompt(client);
                // The original behavior: dismissing the token prompt falls
                // through to the resolver binding.
                if let Some(ActivePrompt {
                    kind: PromptKind::Token,
                    ..
                }) = cancelled
                {
                    self.force_resolve(client);
                }
            }
        }
    }

    /// Re-run the live search for the current query. The lookup table is
    /// rebuilt from scratch inside the session on every call.
    fn refresh_completions(&mut self) {
        let Some(active) = self.prompt.as_mut() else {
            return;
        };
        let PromptKind::Search { session, .. } = &mut active.kind else {
            return;
        };
        let query = active.prompt.query().to_string();
        match session.update(&self.helper, &query) {
            Ok(labels) => active.prompt.set_completions(labels.to_vec()),
            Err(e) => {
                tracing::warn!(error = %e, query, "live search failed");
                active.prompt.set_completions(Vec::new());
            }
        }
    }

    fn finish_prompt(&mut self, client: &mut Handle, kind: PromptKind, text: String) {
        match kind {
            PromptKind::Search { session, dir } => {
                let label = text.trim();
                match session.resolve(label) {
                    Some(media_id) => match sidecar::write(&dir, media_id) {
                        Ok(()) => self.notice(client, &format!("AniList: linked to {label}")),
                        Err(e) => {
                            tracing::warn!(error = %e, dir = %dir.display(), "sidecar write failed");
                            self.notice(client, "minori: could not save the selection");
                        }
                    },
                    None => {
                        self.notice(
                            client,
                            &format!("\"{label}\" is not among the search results"),
                        );
                    }
                }
            }
            PromptKind::Token => match token::write(&self.state_dir, &text) {
                Ok(()) => self.notice(client, "minori: token saved"),
                Err(e) => {
                    tracing::warn!(error = %e, "token write failed");
                    self.notice(client, "minori: could not write the token file");
                }
            },
            PromptKind::Score { path } => {
                let value = text.trim();
                if progress::parse_score(value).is_none() {
                    self.notice(client, &format!("\"{value}\" is not a valid score"));
                    return;
                }
                match self.helper.invoke(&["score", &path, value]) {
                    Ok(Envelope::Ok { .. }) => self.notice(client, "AniList: score updated"),
                    Ok(env) => {
                        tracing::warn!(message = ?env.message(), "helper rejected score");
                    }
                    Err(e) => self.notice(client, &format!("AniList helper failed: {e}")),
                }
            }
        }
    }

    fn open_prompt(&mut self, client: &mut Handle, prompt: Prompt, kind: PromptKind) {
        let content = keys::prompt_section_content(&self.client_name);
        let _ = client.command(&["define-section", keys::PROMPT_SECTION, &content, "force"]);
        let _ = client.command(&["enable-section", keys::PROMPT_SECTION, "force"]);
        let _ = client.command(&["show-text", &prompt.render(), PROMPT_OSD_MS]);
        self.prompt = Some(ActivePrompt { prompt, kind });
    }

    fn close_prompt(&mut self, client: &mut Handle) -> Option<ActivePrompt> {
        let _ = client.command(&["disable-section", keys::PROMPT_SECTION]);
        let _ = client.command(&["show-text", "", "1"]);
        self.prompt.take()
    }

    fn render_prompt(&self, client: &mut Handle) {
        if let Some(active) = &self.prompt {
            let _ = client.command(&["show-text", &active.prompt.render(), PROMPT_OSD_MS]);
        }
    }

    fn notice(&self, client: &mut Handle, text: &str) {
        let _ = client.command(&["show-text", text, NOTICE_OSD_MS]);
    }
}
