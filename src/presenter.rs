// 🎨 Confirmation Presenter
//
// Maps a handler outcome onto one of the confirmation views and renders it.
// The same View drives both the HTML page and the terminal page.

use crate::error::RsvpError;
use crate::handler::Outcome;
use crate::status::RsvpStatus;

// ============================================================================
// VIEW STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingParameter,
    InvalidStatus,
    UpdateFailed,
    Unexpected,
}

impl From<&RsvpError> for ErrorKind {
    fn from(err: &RsvpError) -> Self {
        match err {
            RsvpError::MissingParameter(_) => ErrorKind::MissingParameter,
            RsvpError::InvalidStatus(_) => ErrorKind::InvalidStatus,
            RsvpError::UpdateFailed(_) => ErrorKind::UpdateFailed,
            RsvpError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

/// Loading only exists on the terminal page; the server renders synchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Error(ErrorKind),
    Attending,
    Declined,
}

impl View {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Ok(RsvpStatus::Attending) => View::Attending,
            Ok(RsvpStatus::Declined) => View::Declined,
            // The handler never applies Pending
            Ok(RsvpStatus::Pending) => View::Error(ErrorKind::Unexpected),
            Err(err) => View::Error(err.into()),
        }
    }

    /// Every view except Loading is final for a request
    pub fn is_terminal(&self) -> bool {
        !matches!(self, View::Loading)
    }

    pub fn wording(&self) -> Wording {
        match self {
            View::Loading => Wording {
                title: "Confirming your RSVP…",
                message: "Hang tight while we record your response.",
                next_steps: &[],
                badge: None,
            },
            View::Error(kind) => Wording {
                title: "We couldn't record your RSVP",
                message: error_message(*kind),
                next_steps: &[],
                badge: None,
            },
            View::Attending => Wording {
                title: "You're on the list!",
                message: "Thank you for confirming. We can't wait to celebrate with you.",
                next_steps: &[
                    "Keep an eye on your inbox for event details and timings.",
                    "Add the date to your calendar.",
                    "Changed your plans? Use the decline link in your invitation.",
                ],
                badge: Some("RSVP: attending"),
            },
            View::Declined => Wording {
                title: "Sorry you can't make it",
                message: "Thanks for letting us know. You'll be missed, and we hope to see you at the next one.",
                next_steps: &[],
                badge: Some("RSVP: declined"),
            },
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            View::Loading => Theme {
                accent: (100, 116, 139),
                background: (248, 250, 252),
                icon: "…",
            },
            View::Error(_) => Theme {
                accent: (220, 38, 38),
                background: (254, 242, 242),
                icon: "✕",
            },
            View::Attending => Theme {
                accent: (22, 163, 74),
                background: (240, 253, 244),
                icon: "✓",
            },
            View::Declined => Theme {
                accent: (217, 119, 6),
                background: (255, 251, 235),
                icon: "♡",
            },
        }
    }
}

/// All error kinds share one visual treatment; only the wording differs
fn error_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::MissingParameter => {
            "This RSVP link is incomplete. Please use the full link from your invitation email."
        }
        ErrorKind::InvalidStatus => {
            "This RSVP link isn't valid. Please use one of the buttons in your invitation email."
        }
        ErrorKind::UpdateFailed => {
            "We couldn't update your response right now. Please try the link again later."
        }
        ErrorKind::Unexpected => "Something went wrong while processing your RSVP.",
    }
}

pub const CONTACT_HINT: &str =
    "If the problem persists, please contact the event organizer directly.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wording {
    pub title: &'static str,
    pub message: &'static str,
    pub next_steps: &'static [&'static str],
    pub badge: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub accent: (u8, u8, u8),
    pub background: (u8, u8, u8),
    pub icon: &'static str,
}

impl Theme {
    pub fn accent_hex(&self) -> String {
        hex(self.accent)
    }

    pub fn background_hex(&self) -> String {
        hex(self.background)
    }
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

// ============================================================================
// HTML RENDERING
// ============================================================================

/// Full, self-contained confirmation page
pub fn render_html(view: &View) -> String {
    let wording = view.wording();
    let theme = view.theme();

    let mut body = String::new();
    body.push_str(&format!(
        "<div class=\"icon\">{}</div>\n      <h1>{}</h1>\n      <p class=\"message\">{}</p>\n",
        theme.icon, wording.title, wording.message
    ));

    if let Some(badge) = wording.badge {
        body.push_str(&format!("      <span class=\"badge\">{}</span>\n", badge));
    }

    if !wording.next_steps.is_empty() {
        body.push_str("      <div class=\"next\">\n        <h2>What's next?</h2>\n        <ul>\n");
        for step in wording.next_steps {
            body.push_str(&format!("          <li>{}</li>\n", step));
        }
        body.push_str("        </ul>\n      </div>\n");
    }

    if matches!(view, View::Error(_)) {
        body.push_str(&format!("      <p class=\"hint\">{}</p>\n", CONTACT_HINT));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
      body {{ margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
             font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
             background: {background}; color: #1f2937; }}
      .card {{ max-width: 480px; margin: 24px; padding: 40px 32px; background: #ffffff; border-radius: 16px;
              box-shadow: 0 10px 30px rgba(0, 0, 0, 0.08); text-align: center; border-top: 6px solid {accent}; }}
      .icon {{ width: 64px; height: 64px; margin: 0 auto 16px; border-radius: 50%; background: {accent};
              color: #ffffff; font-size: 32px; line-height: 64px; }}
      h1 {{ margin: 0 0 12px; font-size: 24px; color: {accent}; }}
      .message {{ margin: 0 0 20px; line-height: 1.5; }}
      .badge {{ display: inline-block; padding: 6px 14px; border-radius: 999px; background: {background};
               color: {accent}; font-weight: 600; font-size: 14px; }}
      .next {{ margin-top: 24px; text-align: left; }}
      .next h2 {{ font-size: 16px; margin: 0 0 8px; }}
      .next li {{ margin-bottom: 6px; }}
      .hint {{ font-size: 14px; color: #6b7280; }}
    </style>
  </head>
  <body>
    <div class="card">
      {body}    </div>
  </body>
</html>
"#,
        title = wording.title,
        background = theme.background_hex(),
        accent = theme.accent_hex(),
        body = body,
    )
}
