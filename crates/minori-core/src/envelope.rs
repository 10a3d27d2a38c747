use serde::Deserialize;

/// One reply from the helper process, discriminated by its `status` field.
///
/// `ok` payloads differ by command: `report` and `auth` carry at most a
/// message, `search` fills `page`, `guessit` fills `matches`. The unused
/// fields simply stay at their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum Envelope {
    #[serde(rename = "ok")]
    Ok {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        page: Vec<MediaEntry>,
        #[serde(default)]
        matches: TitleGuess,
    },
    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(rename = "tokenupdate")]
    TokenUpdate {
        #[serde(default)]
        message: Option<String>,
    },
}

impl Envelope {
    /// The free-text message, whatever the status.
    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Ok { message, .. }
            | Envelope::Error { message }
            | Envelope::TokenUpdate { message } => message.as_deref(),
        }
    }
}

/// A media entry from a `search` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaEntry {
    pub id: i64,
    #[serde(default)]
    pub title: MediaTitle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaTitle {
    pub english: Option<String>,
    pub romaji: Option<String>,
}

/// Best-effort filename parse from a `guessit` reply. The helper emits the
/// full guess dictionary; only the title matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleGuess {
    pub title: Option<String>,
}
