//! Property tests for balance mutation invariants.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use osprey_shared::types::{AccountId, Currency, UserId};

use crate::account::{Account, AccountNumber, AccountType, SortCode};
use crate::ledger::error::LedgerError;

fn test_account(balance: Decimal) -> Account {
    Account {
        id: AccountId::new(),
        account_number: AccountNumber::from_sequence(1),
        sort_code: SortCode::default(),
        name: "Prop Account".to_string(),
        account_type: AccountType::Personal,
        owner_id: UserId::new(),
        balance,
        currency: Currency::Gbp,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        version: 1,
        transactions: Vec::new(),
    }
}

/// One step of a generated deposit/withdraw workload, amounts in pence.
#[derive(Debug, Clone, Copy)]
enum Step {
    Deposit(u32),
    Withdraw(u32),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1u32..=1_000_000).prop_map(Step::Deposit),
        (1u32..=1_000_000).prop_map(Step::Withdraw),
    ]
}

fn pence(p: u32) -> Decimal {
    Decimal::new(i64::from(p), 2)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// For any interleaving of deposits and withdrawals, the balance never
    /// goes negative: overdraw attempts fail and leave the balance exactly
    /// where it was.
    #[test]
    fn prop_balance_never_negative(steps in prop::collection::vec(step_strategy(), 1..50)) {
        let mut account = test_account(Decimal::ZERO);
        let mut expected = Decimal::ZERO;

        for step in steps {
            match step {
                Step::Deposit(p) => {
                    account.deposit(pence(p));
                    expected += pence(p);
                }
                Step::Withdraw(p) => {
                    let amount = pence(p);
                    if amount <= expected {
                        account.withdraw(amount).unwrap();
                        expected -= amount;
                    } else {
                        let before = account.balance;
                        let err = account.withdraw(amount).unwrap_err();
                        prop_assert!(
                            matches!(err, LedgerError::InsufficientFunds { .. }),
                            "expected InsufficientFunds, got {err:?}"
                        );
                        prop_assert_eq!(account.balance, before);
                    }
                }
            }

            prop_assert!(account.balance >= Decimal::ZERO);
            prop_assert_eq!(account.balance, expected);
        }
    }

    /// Deposit followed by an equal withdrawal is an identity on the balance.
    #[test]
    fn prop_deposit_withdraw_round_trip(start in 0u32..=1_000_000, p in 1u32..=1_000_000) {
        let mut account = test_account(pence(start));
        account.deposit(pence(p));
        account.withdraw(pence(p)).unwrap();
        prop_assert_eq!(account.balance, pence(start));
    }
}
