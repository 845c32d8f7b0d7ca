//! Osprey ledger demo.
//!
//! Wires the account service and transaction processor to the in-memory
//! store, runs a scripted deposit/withdraw scenario, then races a set of
//! concurrent depositors that retry on conflict.
//!
//! Usage: cargo run --bin osprey-demo

use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use osprey_core::account::{
    AccountDefaults, AccountNumber, AccountService, AccountType, CreateAccountInput, SortCode,
};
use osprey_core::ledger::{CreateTransactionInput, TransactionKind, TransactionProcessor};
use osprey_shared::AppConfig;
use osprey_shared::types::{Currency, UserId};
use osprey_store::{InMemoryAccountStore, InMemorySequence};

const DEPOSITORS: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "osprey=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let sort_code: SortCode = config
        .ledger
        .sort_code
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let defaults = AccountDefaults {
        currency: config.ledger.default_currency,
        sort_code,
    };

    let store = Arc::new(InMemoryAccountStore::new());
    let allocator = Arc::new(InMemorySequence::new());
    let service = Arc::new(AccountService::new(
        store.clone(),
        allocator,
        defaults.clone(),
    ));
    let processor = Arc::new(TransactionProcessor::new(store));

    let owner = UserId::new();
    let account = service
        .create_account(
            owner,
            CreateAccountInput {
                name: "Demo Current Account".to_string(),
                account_type: AccountType::Personal,
            },
        )
        .await?;
    info!(
        account_number = %account.account_number,
        currency = %account.currency,
        "Account opened"
    );

    // Scripted scenario: deposit, then withdraw part of it
    for (kind, amount) in [
        (TransactionKind::Deposit, dec!(1100.00)),
        (TransactionKind::Withdraw, dec!(200.00)),
    ] {
        let txn = processor
            .create_transaction(
                &account.account_number,
                owner,
                &CreateTransactionInput {
                    kind,
                    amount,
                    currency: defaults.currency,
                    reference: Some("scripted".to_string()),
                },
            )
            .await?;
        info!(kind = %txn.kind, amount = %txn.amount, "Transaction committed");
    }

    let fetched = service.fetch_account(&account.account_number, owner).await?;
    info!(balance = %fetched.balance, version = fetched.version, "Scenario complete");

    // Concurrent depositors racing on the same account, retrying on conflict
    let mut handles = Vec::with_capacity(DEPOSITORS);
    for i in 0..DEPOSITORS {
        let processor = processor.clone();
        let number = account.account_number.clone();
        let currency = defaults.currency;
        handles.push(tokio::spawn(async move {
            deposit_with_retry(&processor, &number, owner, i, currency).await
        }));
    }
    let mut total_retries = 0_u32;
    for handle in join_all(handles).await {
        total_retries += handle.context("depositor task panicked")??;
    }

    let finished = service.fetch_account(&account.account_number, owner).await?;
    info!(
        balance = %finished.balance,
        transactions = finished.transactions.len(),
        version = finished.version,
        retries = total_retries,
        "Concurrent depositors finished"
    );

    Ok(())
}

/// Posts one 25.00 deposit, retrying while the error is retryable.
/// Returns the number of retries the deposit needed.
async fn deposit_with_retry(
    processor: &TransactionProcessor,
    number: &AccountNumber,
    owner: UserId,
    depositor: usize,
    currency: Currency,
) -> anyhow::Result<u32> {
    let input = CreateTransactionInput {
        kind: TransactionKind::Deposit,
        amount: dec!(25.00),
        currency,
        reference: Some(format!("depositor-{depositor}")),
    };

    let mut retries = 0_u32;
    loop {
        match processor.create_transaction(number, owner, &input).await {
            Ok(_) => return Ok(retries),
            Err(err) if err.is_retryable() => {
                retries += 1;
                tokio::task::yield_now().await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
