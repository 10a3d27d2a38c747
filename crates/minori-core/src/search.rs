use std::collections::HashMap;
use std::path::Path;

use crate::bridge::Helper;
use crate::envelope::{Envelope, MediaEntry};
use crate::error::MinoriError;
use crate::sidecar;

/// Whether a directory still needs interactive resolution. An existing
/// sidecar short-circuits the whole guess-and-prompt flow.
pub fn needs_resolution(dir: &Path) -> bool {
    !sidecar::exists(dir)
}

/// Live search state backing one disambiguation prompt.
///
/// The label→identifier lookup is valid for the most recent query only;
/// every `update` rebuilds it from scratch, so a label submitted after the
/// query changed underneath it no longer resolves.
#[derive(Debug, Default)]
pub struct SearchSession {
    labels: Vec<String>,
    by_label: HashMap<String, i64>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-run the search for `query` and rebuild the lookup.
    ///
    /// An empty query clears the results without invoking the helper.
    /// `error` and `tokenupdate` replies clear the lookup and leave the
    /// completion list empty; transport failures propagate.
    pub fn update(&mut self, helper: &Helper, query: &str) -> Result<&[String], MinoriError> {
        self.labels.clear();
        self.by_label.clear();

        if query.trim().is_empty() {
            return Ok(&self.labels);
        }

        match helper.invoke(&["search", query])? {
            Envelope::Ok { page, .. } => {
                for entry in &page {
                    let label = display_label(entry);
                    // Duplicate labels keep the first entry, matching the
                    // order the service returned them in.
                    if !self.by_label.contains_key(&label) {
                        self.by_label.insert(label.clone(), entry.id);
                        self.labels.push(label);
                    }
                }
                tracing::debug!(query, results = self.labels.len(), "search results updated");
            }
            env => {
                tracing::warn!(query, message = ?env.message(), "search returned no results");
            }
        }

        Ok(&self.labels)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Identifier for a submitted label, `None` when it is not among the
    /// current query's results.
    pub fn resolve(&self, label: &str) -> Option<i64> {
        self.by_label.get(label).copied()
    }
}

/// Best-effort title guess for the search prompt prefill.
///
/// Asks the helper to parse the playing file's name. Every failure mode
/// degrades to an empty prefill; the user types the title instead.
pub fn title_guess(helper: &Helper, path: &str) -> String {
    match helper.invoke(&["guessit", path]) {
        Ok(Envelope::Ok { matches, .. }) => matches.title.unwrap_or_default(),
        Ok(env) => {
            tracing::warn!(path, message = ?env.message(), "title guess rejected");
            String::new()
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "title guess failed");
            String::new()
        }
    }
}

/// Display label for a media entry: English title with the romanized title
/// in parentheses, or whichever of the two exists.
pub fn display_label(entry: &MediaEntry) -> String {
    match (&entry.title.english, &entry.title.romaji) {
        (Some(english), Some(romaji)) if english != romaji => format!("{english} ({romaji})"),
        (Some(english), _) => english.clone(),
        (None, Some(romaji)) => romaji.clone(),
        (None, None) => format!("#{}", entry.id),
    }
}
