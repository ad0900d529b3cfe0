/// Utility functions for Telegram HTML formatting
///
/// Messages are sent with `ParseMode::Html`, so any user supplied text
/// (handles, names) must be escaped before it is interpolated.
/// Escapes the three characters Telegram's HTML parser treats as markup
///
/// # Example
/// ```
/// use team_invite_bot::utils::html::escape_html;
///
/// let escaped = escape_html("<b>Tom & Jerry</b>");
/// assert_eq!(escaped, "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
