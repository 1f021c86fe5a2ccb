use rand::Rng;

pub const COUNTRY_PREFIX: &str = "DE";
pub const DIGITS: usize = 20;

const LOWEST: u128 = 10_000_000_000_000_000_000;
const HIGHEST: u128 = 99_999_999_999_999_999_999;

/// Source of candidate account numbers. Uniqueness is settled by the store.
pub trait AccountNumberSource {
    fn next_account_number(&self) -> String;
}

/// `DE` followed by a uniformly drawn 20 digit number without a leading zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAccountNumbers;

impl AccountNumberSource for RandomAccountNumbers {
    fn next_account_number(&self) -> String {
        let digits = rand::thread_rng().gen_range(LOWEST..=HIGHEST);
        format!("{COUNTRY_PREFIX}{digits}")
    }
}

/// Matches `^DE\d{20}$`.
pub fn is_well_formed_account_number(account_number: &str) -> bool {
    account_number
        .strip_prefix(COUNTRY_PREFIX)
        .is_some_and(|digits| digits.len() == DIGITS && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_numbers_are_well_formed() {
        let source = RandomAccountNumbers;
        for _ in 0..1000 {
            let number = source.next_account_number();
            assert_eq!(number.len(), 22);
            assert!(is_well_formed_account_number(&number), "{number}");
            assert_ne!(&number[2..3], "0");
        }
    }

    #[test]
    fn generated_numbers_do_not_repeat() {
        let source = RandomAccountNumbers;
        let numbers: HashSet<String> = (0..10_000).map(|_| source.next_account_number()).collect();
        assert_eq!(numbers.len(), 10_000);
    }

    #[test]
    fn format_check() {
        assert!(is_well_formed_account_number("DE12345678901234567890"));
        assert!(!is_well_formed_account_number("DE1234567890123456789"));
        assert!(!is_well_formed_account_number("DE123456789012345678901"));
        assert!(!is_well_formed_account_number("FR12345678901234567890"));
        assert!(!is_well_formed_account_number("DE1234567890123456789x"));
        assert!(!is_well_formed_account_number("DE1000000000000001"));
    }
}
