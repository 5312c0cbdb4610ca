//! Ticket codes: the short, shareable identifier handed to a submitter.
//!
//! Codes look like `BT-7QX2M9`: a fixed prefix plus six characters from
//! `[A-Z0-9]`. Lookups are case-insensitive, so every code is normalized to
//! uppercase before it touches the database.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

/// Prefix shared by every ticket.
pub const TICKET_PREFIX: &str = "BT-";

/// Number of random characters after the prefix.
pub const TICKET_SUFFIX_LEN: usize = 6;

const TICKET_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

static TICKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^BT-[A-Z0-9]{6}$").expect("ticket pattern is a valid regex")
});

/// Draw a fresh ticket code. Uniqueness is checked by the caller.
pub fn generate_ticket() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..TICKET_SUFFIX_LEN)
        .map(|_| TICKET_CHARSET[rng.random_range(0..TICKET_CHARSET.len())] as char)
        .collect();
    format!("{TICKET_PREFIX}{suffix}")
}

/// Canonical form of a user-typed ticket: trimmed and uppercased.
///
/// No shape check happens here. A blank or malformed code simply matches no
/// complaint.
pub fn normalize_ticket(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Whether `ticket` has the canonical `BT-XXXXXX` shape.
pub fn is_well_formed(ticket: &str) -> bool {
    TICKET_PATTERN.is_match(ticket)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_tickets_are_well_formed() {
        for _ in 0..200 {
            let ticket = generate_ticket();
            assert!(is_well_formed(&ticket), "bad ticket: {ticket}");
        }
    }

    #[test]
    fn generated_tickets_are_distinct() {
        // Birthday bound for 50 draws from 36^6 codes is about 6e-7.
        let tickets: HashSet<String> = (0..50).map(|_| generate_ticket()).collect();
        assert_eq!(tickets.len(), 50);
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_ticket(" bt-ab12cd "), "BT-AB12CD");
        assert_eq!(normalize_ticket("Bt-Ab12Cd"), "BT-AB12CD");
    }

    #[test]
    fn normalize_blank_is_empty() {
        assert_eq!(normalize_ticket("   "), "");
        assert_eq!(normalize_ticket("\t\n"), "");
    }

    #[test]
    fn well_formed_check() {
        assert!(is_well_formed("BT-ABC123"));
        assert!(!is_well_formed("bt-abc123"));
        assert!(!is_well_formed("BT-ABC12"));
        assert!(!is_well_formed("XX-ABC123"));
    }
}
