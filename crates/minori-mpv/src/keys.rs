/// Input section holding the persistent plugin bindings.
pub const BINDINGS_SECTION: &str = "minori-keys";

/// Forced input section capturing keys while a prompt is open.
pub const PROMPT_SECTION: &str = "minori-prompt";

/// mpv key names routed to the plugin while a prompt is open.
///
/// Letters and digits go by their own name; the rest is the punctuation
/// that shows up in anime titles plus the editing keys the prompt
/// understands.
pub fn forwarded_keys() -> Vec<String> {
    let mut keys: Vec<String> = ('a'..='z')
        .chain('A'..='Z')
        .chain('0'..='9')
        .map(|c| c.to_string())
        .collect();
    for punct in [
        "-", "_", ".", ",", ":", ";", "!", "?", "'", "(", ")", "[", "]", "/", "&", "+", "=", "@",
    ] {
        keys.push(punct.to_string());
    }
    for named in ["SPACE", "BS", "ENTER", "ESC", "UP", "DOWN", "TAB"] {
        keys.push(named.to_string());
    }
    keys
}

/// Section content forwarding every prompt key back as a script message.
pub fn prompt_section_content(client_name: &str) -> String {
    forwarded_keys()
        .iter()
        .map(|key| format!("{key} script-message-to {client_name} prompt-key {key}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Section content for the persistent key bindings.
pub fn bindings_section_content(client_name: &str) -> String {
    format!(
        "Ctrl+a script-message-to {client_name} minori-resolve\n\
         Ctrl+e script-message-to {client_name} minori-score"
    )
}
