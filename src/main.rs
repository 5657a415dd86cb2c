use anyhow::{bail, Context, Result};
use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use rsvp_confirm::{
    get_all_guests, insert_guests, load_guests_csv, verify_count, Config, RsvpLinks,
    SqliteGuestStore,
};

const USAGE: &str = "usage:
  rsvp import <guests.csv>
  rsvp list
  rsvp links <guestId>
  rsvp confirm <guestId> <attending|declined>";

#[derive(Debug, PartialEq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// The terminal page draws on the alternate screen in raw mode,
/// so anything written to stderr there would corrupt the frame
fn log_target(command: Option<&str>) -> LogTarget {
    if cfg!(feature = "tui") && command == Some("confirm") {
        LogTarget::File(Config::log_path())
    } else {
        LogTarget::Stderr
    }
}

fn init_logging(target: &LogTarget) -> Result<()> {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init()
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    init_logging(&log_target(args.get(1).map(String::as_str)))?;

    let config = Config::load()?;

    match args.get(1).map(String::as_str) {
        Some("import") => {
            let csv_path = args.get(2).context(USAGE)?;
            run_import(&config, Path::new(csv_path))
        }
        Some("list") => run_list(&config),
        Some("links") => {
            let guest_id = args.get(2).context(USAGE)?;
            run_links(&config, guest_id)
        }
        Some("confirm") => run_confirm_mode(&config, args.get(2), args.get(3)),
        _ => bail!(USAGE),
    }
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    println!("🗄️  Guest list import - CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Loading CSV...");
    let guests = load_guests_csv(csv_path)?;
    println!("✓ Loaded {} guests from CSV", guests.len());

    let store = SqliteGuestStore::open(&config.db_path)?;

    println!("\n💾 Inserting guests...");
    let (inserted, count) = store
        .with_conn(|conn| {
            let inserted = insert_guests(conn, &guests)?;
            let count = verify_count(conn)?;
            Ok((inserted, count))
        })?;

    println!("✓ Inserted: {} guests", inserted);
    println!("✓ Skipped duplicates: {}", guests.len() - inserted);
    println!("✓ Database contains {} guests", count);

    Ok(())
}

fn run_list(config: &Config) -> Result<()> {
    let store = SqliteGuestStore::open(&config.db_path)?;
    let guests = store.with_conn(get_all_guests)?;

    println!("{:<38} {:<24} {:<20} {}", "ID", "NAME", "EVENT", "RSVP");
    for guest in &guests {
        println!(
            "{:<38} {:<24} {:<20} {}",
            guest.id, guest.name, guest.event_name, guest.rsvp_status
        );
    }
    println!("\n{} guests", guests.len());

    Ok(())
}

fn run_links(config: &Config, guest_id: &str) -> Result<()> {
    let links = RsvpLinks::build(&config.base_url, guest_id);
    println!("Attend:  {}", links.attend);
    println!("Decline: {}", links.decline);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_confirm_mode(
    config: &Config,
    guest_id: Option<&String>,
    status: Option<&String>,
) -> Result<()> {
    use rsvp_confirm::ui::{run_confirm, ConfirmApp};
    use rsvp_confirm::RsvpRequest;

    let store = SqliteGuestStore::open(&config.db_path)?;

    // Missing arguments go through the handler like a truncated link would
    let request = RsvpRequest {
        guest_id: guest_id.cloned(),
        status: status.cloned(),
    };

    let mut app = ConfirmApp::new(request);
    run_confirm(&mut app, &store)?;

    println!("{}", app.view.wording().title);
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_confirm_mode(
    _config: &Config,
    _guest_id: Option<&String>,
    _status: Option<&String>,
) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web server: cargo run --bin rsvp-server --features server");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_commands_log_to_stderr() {
        for command in [Some("import"), Some("list"), Some("links"), None] {
            assert_eq!(log_target(command), LogTarget::Stderr);
        }
    }

    #[cfg(feature = "tui")]
    #[test]
    fn test_terminal_page_logs_to_file() {
        assert_eq!(log_target(Some("confirm")), LogTarget::File(Config::log_path()));
    }
}
