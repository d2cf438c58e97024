//! Property tests for user field validation

use proptest::prelude::*;
use ProvisionBot::config::ProvisioningConfig;
use ProvisionBot::utils::UserValidator;

fn validator() -> UserValidator {
    UserValidator::from_config(&ProvisioningConfig::default())
}

proptest! {
    #[test]
    fn well_formed_usernames_are_accepted(name in "[A-Za-z][A-Za-z0-9_]{2,31}") {
        prop_assert!(validator().validate_username(&name));
    }

    #[test]
    fn usernames_starting_with_non_letter_are_rejected(name in "[0-9_][A-Za-z0-9_]{2,31}") {
        prop_assert!(!validator().validate_username(&name));
    }

    #[test]
    fn usernames_with_symbols_are_rejected(
        head in "[A-Za-z]{2,10}",
        symbol in "[-.@ !#]",
        tail in "[a-z]{0,10}",
    ) {
        let name = format!("{}{}{}", head, symbol, tail);
        prop_assert!(!validator().validate_username(&name));
    }

    #[test]
    fn printable_passwords_are_accepted(password in "[!-~]{4,32}") {
        prop_assert!(validator().validate_password(&password));
    }

    #[test]
    fn passwords_with_whitespace_are_rejected(
        head in "[a-z]{2,10}",
        space in "[ \t]",
        tail in "[a-z]{2,10}",
    ) {
        let password = format!("{}{}{}", head, space, tail);
        prop_assert!(!validator().validate_password(&password));
    }

    #[test]
    fn connection_limit_accepted_only_within_bounds(value in 0i64..1000) {
        let validator = validator();
        let accepted = validator.validate_connection_limit(&value.to_string());
        prop_assert_eq!(accepted, value >= 1 && value <= validator.max_connection_limit() as i64);
    }

    #[test]
    fn expiration_days_accepted_only_within_bounds(value in 0i64..10_000) {
        let validator = validator();
        let accepted = validator.validate_expiration_date(&value.to_string());
        prop_assert_eq!(accepted, value >= 1 && value <= validator.max_expiration_days());
    }

    #[test]
    fn non_numeric_limits_are_rejected(text in "[a-z +-]{1,8}") {
        prop_assert!(!validator().validate_connection_limit(&text));
        prop_assert!(!validator().validate_expiration_date(&text));
    }
}
