//! Deterministic placeholder substitution for event messages.
//!
//! When the active provider has no native event support, dispatch flattens
//! an [`EventMessage`] into plain text with this renderer and sends it down
//! the ordinary text path.

use crate::core::EventMessage;

/// Template used when the global settings carry none.
pub const DEFAULT_TEMPLATE: &str = "{{emoji}}{{emoji}}{{emoji}}\nEvent: {{event}}\nClients: {{client}}\nMessage: {{message}}\nTime: {{time}}";

/// Renders `template` by substituting the five recognized placeholders.
///
/// Substitutions, replacing every literal occurrence:
/// * `{{event}}` - the event name
/// * `{{client}}` - client display names joined with `", "`; a client with
///   a blank name is represented by its uuid instead
/// * `{{time}}` - the event timestamp in RFC 3339
/// * `{{message}}` - the free-text message
/// * `{{emoji}}` - the emoji string
///
/// Unrecognized placeholders are left verbatim; that is not an error.
pub fn render(template: &str, event: &EventMessage) -> String {
    let client_names: Vec<&str> = event
        .clients
        .iter()
        .map(|c| {
            if c.name.trim().is_empty() {
                c.uuid.as_str()
            } else {
                c.name.as_str()
            }
        })
        .collect();
    let joined_clients = client_names.join(", ");

    template
        .replace("{{event}}", &event.event)
        .replace("{{client}}", &joined_clients)
        .replace("{{time}}", &event.time.to_rfc3339())
        .replace("{{message}}", &event.message)
        .replace("{{emoji}}", &event.emoji)
}
