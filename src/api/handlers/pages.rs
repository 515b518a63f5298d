//! Static HTML served to the browser.

pub const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Skin Check</title>
</head>
<body>
  <h1>Verified!</h1>
  <p>Your locker has been posted to the server. You can close this tab.</p>
</body>
</html>
"#;

const LANDING_FORM: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Skin Check</title>
</head>
<body>
  <h1>Skin Check</h1>
  <form method="get" action="/">
    <label for="requester">Discord user id</label>
    <input id="requester" name="requester" required pattern="[A-Za-z0-9.\-]{1,64}">
    <button type="submit">Continue</button>
  </form>
</body>
</html>
"#;

const LANDING_CONSENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Skin Check</title>
</head>
<body>
  <h1>Skin Check</h1>
  <p>Sign in with Epic Games to share your locker with <code>{REQUESTER}</code>.</p>
  <p><a href="{CONSENT_URL}">Verify with Epic Games</a></p>
</body>
</html>
"#;

#[must_use]
pub const fn landing_form() -> &'static str {
    LANDING_FORM
}

/// Landing page that sends the browser to Epic's consent screen.
#[must_use]
pub fn landing_consent(requester: &str, consent_url: &str) -> String {
    LANDING_CONSENT
        .replace("{REQUESTER}", &escape_html(requester))
        .replace("{CONSENT_URL}", &escape_html(consent_url))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
