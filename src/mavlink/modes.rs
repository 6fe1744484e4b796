//! Flight-mode names for ArduPilot custom_mode codes
//!
//! The autopilot reports its flight mode as a numeric `custom_mode` in each
//! heartbeat; this table maps the codes to their display names. Codes 8, 10,
//! 12, 14 and 15 are not assigned in this scheme and fall through to the
//! formatted fallback, as does anything above 21.

/// custom_mode code to mode name, sorted by code
static MODE_TABLE: &[(u32, &str)] = &[
    (0, "STABILIZE"),
    (1, "ACRO"),
    (2, "ALT_HOLD"),
    (3, "AUTO"),
    (4, "GUIDED"),
    (5, "LOITER"),
    (6, "RTL"),
    (7, "CIRCLE"),
    (9, "LAND"),
    (11, "DRIFT"),
    (13, "SPORT"),
    (16, "POSHOLD"),
    (17, "BRAKE"),
    (18, "THROW"),
    (19, "AVOID_ADSB"),
    (20, "GUIDED_NOGPS"),
    (21, "SMART_RTL"),
];

/// Resolve a custom_mode code to its name
///
/// Unknown codes format as `UNKNOWN(<code>)`.
pub fn mode_name(custom_mode: u32) -> String {
    match MODE_TABLE
        .binary_search_by_key(&custom_mode, |&(code, _)| code)
    {
        Ok(idx) => MODE_TABLE[idx].1.to_string(),
        Err(_) => format!("UNKNOWN({})", custom_mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_modes() {
        assert_eq!(mode_name(0), "STABILIZE");
        assert_eq!(mode_name(4), "GUIDED");
        assert_eq!(mode_name(6), "RTL");
        assert_eq!(mode_name(21), "SMART_RTL");
    }

    #[test]
    fn unassigned_gaps_fall_through() {
        assert_eq!(mode_name(8), "UNKNOWN(8)");
        assert_eq!(mode_name(10), "UNKNOWN(10)");
        assert_eq!(mode_name(15), "UNKNOWN(15)");
    }

    #[test]
    fn out_of_range_code() {
        assert_eq!(mode_name(42), "UNKNOWN(42)");
    }

    #[test]
    fn table_is_sorted_for_binary_search() {
        for pair in MODE_TABLE.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }
}
