//! Property-based tests for the configuration file format and merge rules.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use moemail_deploy::domain::config::{validate_config_key, validate_config_value};
use moemail_deploy::domain::workflow::parse_menu_choice;
use moemail_deploy::domain::{ConfigEntries, SiteDomain, merge_entries, parse_env, render_env};

fn arb_entries() -> impl Strategy<Value = ConfigEntries> {
    prop::collection::vec(
        ("[A-Z_][A-Z0-9_]{0,15}", "[a-zA-Z0-9 '\"\\\\$#=.:/_-]{0,24}"),
        0..8,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

// ============================================================================
// merge_entries()
// ============================================================================

proptest! {
    /// Keys not named in the update keep their value.
    #[test]
    fn prop_merge_never_drops_untouched_keys(base in arb_entries(), updates in arb_entries()) {
        let merged = merge_entries(&base, &updates);
        for (key, value) in &base {
            if !updates.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    /// Every updated key ends up with its new value.
    #[test]
    fn prop_merge_applies_every_update(base in arb_entries(), updates in arb_entries()) {
        let merged = merge_entries(&base, &updates);
        for (key, value) in &updates {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    /// Applying the same update twice changes nothing the second time.
    #[test]
    fn prop_merge_is_idempotent(base in arb_entries(), updates in arb_entries()) {
        let once = merge_entries(&base, &updates);
        let twice = merge_entries(&once, &updates);
        prop_assert_eq!(once, twice);
    }
}

// ============================================================================
// render_env() / parse_env()
// ============================================================================

proptest! {
    /// Rendered entries parse back unchanged, order, quotes and padding included.
    #[test]
    fn prop_rendered_file_parses_back(entries in arb_entries()) {
        let parsed = parse_env(&render_env(&entries));
        prop_assert!(parsed.skipped.is_empty(), "skipped: {:?}", parsed.skipped);
        prop_assert_eq!(parsed.entries, entries);
    }

    /// Whatever the input, parsing never panics and only yields valid keys.
    #[test]
    fn prop_parse_yields_only_valid_keys(content in "[ -~\n]{0,200}") {
        for key in parse_env(&content).entries.keys() {
            prop_assert!(validate_config_key(key).is_ok(), "invalid key kept: {key}");
        }
    }

    /// Values containing a line break are always rejected.
    #[test]
    fn prop_line_breaks_rejected(head in "[a-z]{0,8}", tail in "[a-z]{0,8}", brk in "[\r\n]") {
        let value = format!("{head}{brk}{tail}");
        prop_assert!(validate_config_value("KEY", &value).is_err());
    }
}

// ============================================================================
// SiteDomain / menu input
// ============================================================================

proptest! {
    /// Trailing slashes never reach the callback URL.
    #[test]
    fn prop_site_domain_callback_has_single_slash(host in "[a-z]{1,12}\\.[a-z]{2,6}", slashes in 0usize..4) {
        let raw = format!("https://{host}{}", "/".repeat(slashes));
        let domain = SiteDomain::parse(&raw).expect("valid domain");
        prop_assert_eq!(
            domain.callback_url(),
            format!("https://{host}/api/auth/callback/github")
        );
    }

    /// Anything outside 0-4 is not a menu choice.
    #[test]
    fn prop_menu_rejects_out_of_range_numbers(n in 5u32..10_000) {
        prop_assert!(parse_menu_choice(&n.to_string()).is_err());
    }
}
