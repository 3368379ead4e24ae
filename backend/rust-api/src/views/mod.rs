//! Server-rendered chat page.

use crate::models::History;

pub mod transcript;

pub const PAGE_TITLE: &str = "Word of the day!";

const FIRST_PLACEHOLDER: &str =
    "What word do you want to learn? Eg. Tedious, Sacrosanct, Unfathomable, etc.";
const FOLLOW_UP_PLACEHOLDER: &str = "Message...";

const STYLES: &str = r#"
*, *::before, *::after { box-sizing: border-box; }
html { -webkit-font-smoothing: antialiased; -moz-osx-font-smoothing: grayscale; }
body {
  margin: 0; width: 100vw; height: 100vh; padding: 2rem; gap: 2rem;
  display: flex; flex-direction: column; align-items: stretch; justify-content: flex-start;
  background: #171717; font-family: "DM Sans", system-ui, sans-serif;
}
h1 { margin: 0; font-size: 2.25rem; line-height: 1; font-weight: 900; color: #fff; text-align: center; }
#container {
  position: relative; flex: 1; display: flex; flex-direction: column; align-items: stretch;
  justify-content: flex-start; overflow: hidden; padding: 2rem; border-radius: 1.5rem;
  background: #fff; box-shadow: 0 25px 50px -12px rgb(0 0 0 / 0.25);
}
#transcript {
  width: 100%; max-width: 56rem; margin: 0 auto; padding: 0 1rem; flex: 1; overflow: auto;
  display: flex; flex-direction: column; align-items: stretch; justify-content: flex-start;
}
.message {
  width: min(80%, 640px); display: flex; align-items: center; justify-content: flex-start;
  gap: 1rem; padding: 1rem 0; border-bottom: 1px solid rgb(0 0 0 / 0.1);
}
.message-user { flex-direction: row-reverse; text-align: right; margin-left: auto; }
.message-bot { flex-direction: row; }
.avatar { flex: none; border-radius: 0.375rem; }
.avatar-user { background: #bfdbfe; color: #1e3a8a; }
.avatar-bot { background: #99f6e4; color: #134e4a; }
.message-text { flex: 1; margin: 0; font-size: 1.125rem; line-height: 1.375; font-weight: 500; }
.text-user { color: #1e3a8a; }
.question { display: flex; flex-direction: column; gap: 0.5rem; }
.choices { margin: 0; padding: 0; }
.choices li { list-style: decimal inside; }
#chat-form {
  width: min(80%, 640px); margin: 2rem auto 0; display: flex; flex-direction: row;
  align-items: center; justify-content: space-between; gap: 0.5rem; padding: 0.5rem 1.5rem;
  border-radius: 0.75rem; background: #99f6e4; box-shadow: 0 25px 50px -12px rgb(0 0 0 / 0.25);
}
#chat-form fieldset { display: contents; }
#chat-input {
  flex: 1; padding: 0.5rem 0; border: 0; background: transparent; font: inherit;
  font-weight: 700; color: #134e4a; outline: none;
}
#chat-input::placeholder { color: rgb(0 0 0 / 0.5); }
#chat-form button {
  padding: 0.5rem 1.5rem; border: 0; border-radius: 0.75rem; background: #042f2e;
  color: #fff; font: inherit; font-weight: 700; cursor: pointer;
}
#chat-form.is-submitting #chat-input, #chat-form.is-submitting button { opacity: 0.5; }
#chat-form.is-submitting button { cursor: wait; }
"#;

// Scrolls to the newest message and locks the form while a submission is in flight.
// Fields are made read-only rather than disabled so they are still posted.
const SCRIPT: &str = r#"
(function () {
  var transcript = document.getElementById("transcript");
  if (transcript) { transcript.scrollTo(0, transcript.scrollHeight); }
  var form = document.getElementById("chat-form");
  if (!form) { return; }
  form.addEventListener("submit", function (event) {
    if (form.classList.contains("is-submitting")) { event.preventDefault(); return; }
    form.classList.add("is-submitting");
    document.getElementById("chat-input").readOnly = true;
    form.querySelector("button").disabled = true;
  });
})();
"#;

/// Renders the full page for a transcript. The history is embedded in the form
/// so the next submission carries it back.
pub fn render_page(history: &History) -> Result<String, serde_json::Error> {
    let embedded = history.to_json()?;
    let placeholder = if history.is_empty() {
        FIRST_PLACEHOLDER
    } else {
        FOLLOW_UP_PLACEHOLDER
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en" class="antialiased">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="preconnect" href="https://fonts.googleapis.com">
<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin="anonymous">
<link href="https://fonts.googleapis.com/css2?family=DM+Sans:ital,opsz,wght@0,9..40,100..1000;1,9..40,100..1000&amp;display=swap" rel="stylesheet">
<style>{styles}</style>
</head>
<body>
<h1>{title}</h1>
<div id="container">
<div id="transcript">{transcript}</div>
<form id="chat-form" method="post" action="/">
<fieldset>
<input type="hidden" name="history" value="{history}">
<input id="chat-input" name="input" type="text" placeholder="{placeholder}" autocomplete="off" autofocus required maxlength="4000">
<button type="submit">Send</button>
</fieldset>
</form>
</div>
<script>{script}</script>
</body>
</html>
"#,
        title = html_escape(PAGE_TITLE),
        styles = STYLES,
        transcript = transcript::transcript_html(history),
        history = html_escape(&embedded),
        placeholder = html_escape(placeholder),
        script = SCRIPT,
    ))
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
