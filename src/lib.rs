// RSVP Confirmation - Core Library
// Exposes all modules for use in CLI, web server, and tests

pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod links;
pub mod presenter;
pub mod status;

#[cfg(feature = "server")]
pub mod server;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use db::{
    Guest, GuestStore, SqliteGuestStore,
    setup_database, load_guests_csv, insert_guests,
    get_guest, get_all_guests, verify_count, set_rsvp_status,
};
pub use error::{RsvpError, StoreError};
pub use handler::{confirm_rsvp, Outcome, RsvpRequest};
pub use links::{rsvp_link, RsvpLinks, RSVP_PATH};
pub use presenter::{render_html, ErrorKind, Theme, View, Wording};
pub use status::RsvpStatus;

#[cfg(feature = "server")]
pub use server::{router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
