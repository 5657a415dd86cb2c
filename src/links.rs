// 🔗 Confirmation links embedded in invitation emails

use crate::status::RsvpStatus;
use serde::Serialize;

/// Path the confirmation handler is mounted on
pub const RSVP_PATH: &str = "/rsvp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpLinks {
    pub attend: String,
    pub decline: String,
}

impl RsvpLinks {
    pub fn build(base_url: &str, guest_id: &str) -> Self {
        Self {
            attend: rsvp_link(base_url, guest_id, RsvpStatus::Attending),
            decline: rsvp_link(base_url, guest_id, RsvpStatus::Declined),
        }
    }
}

pub fn rsvp_link(base_url: &str, guest_id: &str, status: RsvpStatus) -> String {
    format!(
        "{}{}?guestId={}&status={}",
        base_url.trim_end_matches('/'),
        RSVP_PATH,
        urlencoding::encode(guest_id),
        status.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_links() {
        let links = RsvpLinks::build("https://events.example.com/", "g1");

        assert_eq!(links.attend, "https://events.example.com/rsvp?guestId=g1&status=attending");
        assert_eq!(links.decline, "https://events.example.com/rsvp?guestId=g1&status=declined");
    }

    #[test]
    fn test_guest_id_is_percent_encoded() {
        let link = rsvp_link("http://localhost:3000", "a b&c", RsvpStatus::Attending);
        assert_eq!(link, "http://localhost:3000/rsvp?guestId=a%20b%26c&status=attending");
    }
}
