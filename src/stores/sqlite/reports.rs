//! Implements the SQLite backed report store.
//!
//! Balance and category statistics are computed from the ledger itself; the
//! history series are served straight from the rollup tables, which is what
//! they are maintained for.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, named_params};
use time::{Date, Month, OffsetDateTime};

use crate::{
    Error,
    db::MapRow,
    format::{currency_by_code, format_amount},
    gate::StorageGate,
    models::{CategoryName, OwnerId},
    stores::{
        BalanceStats, CategorySummary, DEFAULT_CURRENCY, HistoryEntry, Period, ReportStore,
        Timeframe, TransactionRecord, sqlite::SQLiteLedgerStore,
    },
};

/// Serves read-only dashboard projections from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteReportStore {
    connection: Arc<Mutex<Connection>>,
    gate: StorageGate,
}

impl SQLiteReportStore {
    /// Create a new store for the SQLite `connection`, admitted through
    /// `gate`.
    pub fn new(connection: Arc<Mutex<Connection>>, gate: StorageGate) -> Self {
        Self { connection, gate }
    }
}

impl ReportStore for SQLiteReportStore {
    async fn balance_stats(
        &self,
        owner: &OwnerId,
        from: Date,
        to: Date,
    ) -> Result<BalanceStats, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let (income, expense) = connection
            .prepare(
                "SELECT
                     COALESCE(SUM(CASE WHEN kind = 'income' THEN amount END), 0),
                     COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount END), 0)
                 FROM \"transaction\"
                 WHERE owner_id = :owner AND date BETWEEN :from AND :to",
            )?
            .query_row(
                named_params! {":owner": owner.as_ref(), ":from": from, ":to": to},
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

        Ok(BalanceStats { income, expense })
    }

    async fn category_stats(
        &self,
        owner: &OwnerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<CategorySummary>, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection
            .prepare(
                "SELECT kind, category, category_icon, SUM(amount)
                 FROM \"transaction\"
                 WHERE owner_id = :owner AND date BETWEEN :from AND :to
                 GROUP BY kind, category, category_icon
                 ORDER BY SUM(amount) DESC",
            )?
            .query_map(
                named_params! {":owner": owner.as_ref(), ":from": from, ":to": to},
                |row| {
                    let raw_kind: String = row.get(0)?;
                    let raw_category: String = row.get(1)?;
                    let category_icon = row.get(2)?;
                    let amount = row.get(3)?;

                    let kind = raw_kind.parse().map_err(|_| {
                        rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            format!("invalid transaction type \"{raw_kind}\"").into(),
                        )
                    })?;

                    Ok(CategorySummary {
                        kind,
                        category: CategoryName::new_unchecked(&raw_category),
                        category_icon,
                        amount,
                    })
                },
            )?
            .map(|maybe_summary| maybe_summary.map_err(Error::SqlError))
            .collect()
    }

    async fn history_periods(&self, owner: &OwnerId) -> Result<Vec<i32>, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let mut years: Vec<i32> = connection
            .prepare(
                "SELECT DISTINCT year FROM day_history
                 WHERE owner_id = :owner
                 ORDER BY year ASC",
            )?
            .query_map(&[(":owner", owner.as_ref())], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        // A fresh owner still needs a selectable period.
        if years.is_empty() {
            years.push(OffsetDateTime::now_utc().year());
        }

        Ok(years)
    }

    async fn history_data(
        &self,
        owner: &OwnerId,
        timeframe: Timeframe,
        period: Period,
    ) -> Result<Vec<HistoryEntry>, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        match timeframe {
            Timeframe::Year => {
                let mut entries: Vec<HistoryEntry> = (0..12)
                    .map(|month| HistoryEntry {
                        year: period.year,
                        month,
                        day: None,
                        income: 0.0,
                        expense: 0.0,
                    })
                    .collect();

                let rows = connection
                    .prepare(
                        "SELECT month, income, expense FROM month_history
                         WHERE owner_id = :owner AND year = :year",
                    )?
                    .query_map(
                        named_params! {":owner": owner.as_ref(), ":year": period.year},
                        |row| Ok((row.get::<_, u8>(0)?, row.get(1)?, row.get(2)?)),
                    )?
                    .collect::<Result<Vec<(u8, f64, f64)>, _>>()?;

                for (month, income, expense) in rows {
                    if let Some(entry) = entries.get_mut(month as usize) {
                        entry.income = income;
                        entry.expense = expense;
                    }
                }

                Ok(entries)
            }
            Timeframe::Month => {
                let month = Month::try_from(period.month + 1)
                    .map_err(|_| Error::InvalidMonth(period.month))?;
                let day_count = month.length(period.year);

                let mut entries: Vec<HistoryEntry> = (1..=day_count)
                    .map(|day| HistoryEntry {
                        year: period.year,
                        month: period.month,
                        day: Some(day),
                        income: 0.0,
                        expense: 0.0,
                    })
                    .collect();

                let rows = connection
                    .prepare(
                        "SELECT day, income, expense FROM day_history
                         WHERE owner_id = :owner AND year = :year AND month = :month",
                    )?
                    .query_map(
                        named_params! {
                            ":owner": owner.as_ref(),
                            ":year": period.year,
                            ":month": period.month,
                        },
                        |row| Ok((row.get::<_, u8>(0)?, row.get(1)?, row.get(2)?)),
                    )?
                    .collect::<Result<Vec<(u8, f64, f64)>, _>>()?;

                for (day, income, expense) in rows {
                    if let Some(entry) = entries.get_mut(day as usize - 1) {
                        entry.income = income;
                        entry.expense = expense;
                    }
                }

                Ok(entries)
            }
        }
    }

    async fn transaction_history(
        &self,
        owner: &OwnerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<TransactionRecord>, Error> {
        let _permit = self.gate.acquire().await?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        // Reads never create settings rows; absent settings mean the default
        // currency.
        let currency_code: String = connection
            .prepare("SELECT currency FROM user_settings WHERE owner_id = :owner")?
            .query_row(&[(":owner", owner.as_ref())], |row| row.get(0))
            .or_else(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Ok(DEFAULT_CURRENCY.to_string()),
                error => Err(error),
            })?;
        let currency = currency_by_code(&currency_code)?;

        connection
            .prepare(
                "SELECT id, owner_id, amount, date, created_at, description, kind, category,
                        category_icon
                 FROM \"transaction\"
                 WHERE owner_id = :owner AND date BETWEEN :from AND :to
                 ORDER BY date DESC, id DESC",
            )?
            .query_map(
                named_params! {":owner": owner.as_ref(), ":from": from, ":to": to},
                SQLiteLedgerStore::map_row,
            )?
            .map(|maybe_transaction| {
                let transaction = maybe_transaction.map_err(Error::SqlError)?;
                let formatted_amount = format_amount(currency, transaction.amount);

                Ok(TransactionRecord {
                    transaction,
                    formatted_amount,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod sqlite_report_store_tests {
    use rusqlite::Connection;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        Error,
        models::{CategoryName, NewTransaction, OwnerId, TransactionType},
        stores::{
            BalanceStats, CategoryStore, LedgerStore, Period, ReportStore, SettingsStore,
            Timeframe,
            sqlite::{SQLAppState, create_app_state},
        },
    };

    fn get_app_state() -> SQLAppState {
        let connection = Connection::open_in_memory().unwrap();
        create_app_state(connection, 5).unwrap()
    }

    async fn create_category(
        state: &mut SQLAppState,
        owner: &OwnerId,
        name: &str,
        kind: TransactionType,
        icon: &str,
    ) {
        state
            .category_store
            .create(owner, CategoryName::new_unchecked(name), kind, icon)
            .await
            .unwrap();
    }

    async fn record(
        state: &mut SQLAppState,
        owner: &OwnerId,
        amount: f64,
        date: Date,
        kind: TransactionType,
        category: &str,
    ) {
        let new_transaction = NewTransaction::new(
            owner.clone(),
            amount,
            date,
            "",
            kind,
            CategoryName::new_unchecked(category),
        )
        .unwrap();

        state
            .ledger_store
            .record_transaction(new_transaction)
            .await
            .unwrap();
    }

    /// A state with one owner, two categories and four transactions spread
    /// over March and April 2024.
    async fn seeded_state() -> (SQLAppState, OwnerId) {
        let mut state = get_app_state();
        let owner = OwnerId::new_unchecked("user_1");
        create_category(&mut state, &owner, "Salary", TransactionType::Income, "💰").await;
        create_category(&mut state, &owner, "Groceries", TransactionType::Expense, "🛒").await;

        record(&mut state, &owner, 2500.0, date!(2024 - 03 - 01), TransactionType::Income, "Salary").await;
        record(&mut state, &owner, 80.0, date!(2024 - 03 - 15), TransactionType::Expense, "Groceries").await;
        record(&mut state, &owner, 20.0, date!(2024 - 03 - 31), TransactionType::Expense, "Groceries").await;
        record(&mut state, &owner, 2500.0, date!(2024 - 04 - 01), TransactionType::Income, "Salary").await;

        (state, owner)
    }

    #[tokio::test]
    async fn balance_stats_sums_by_type_with_inclusive_bounds() {
        let (state, owner) = seeded_state().await;

        let march = state
            .report_store
            .balance_stats(&owner, date!(2024 - 03 - 01), date!(2024 - 03 - 31))
            .await
            .unwrap();

        // Both boundary dates are included, the April payday is not.
        assert_eq!(
            march,
            BalanceStats {
                income: 2500.0,
                expense: 100.0
            }
        );
    }

    #[tokio::test]
    async fn balance_stats_is_zero_for_an_empty_range() {
        let (state, owner) = seeded_state().await;

        let stats = state
            .report_store
            .balance_stats(&owner, date!(2023 - 01 - 01), date!(2023 - 12 - 31))
            .await
            .unwrap();

        assert_eq!(
            stats,
            BalanceStats {
                income: 0.0,
                expense: 0.0
            }
        );
    }

    #[tokio::test]
    async fn category_stats_groups_and_orders_by_amount_descending() {
        let (state, owner) = seeded_state().await;

        let stats = state
            .report_store
            .category_stats(&owner, date!(2024 - 03 - 01), date!(2024 - 04 - 30))
            .await
            .unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category.as_ref(), "Salary");
        assert_eq!(stats[0].kind, TransactionType::Income);
        assert_eq!(stats[0].category_icon, "💰");
        assert_eq!(stats[0].amount, 5000.0);
        assert_eq!(stats[1].category.as_ref(), "Groceries");
        assert_eq!(stats[1].amount, 100.0);
    }

    #[tokio::test]
    async fn history_periods_lists_distinct_years_ascending() {
        let mut state = get_app_state();
        let owner = OwnerId::new_unchecked("user_1");
        create_category(&mut state, &owner, "Salary", TransactionType::Income, "💰").await;
        record(&mut state, &owner, 1.0, date!(2025 - 06 - 01), TransactionType::Income, "Salary").await;
        record(&mut state, &owner, 1.0, date!(2023 - 06 - 01), TransactionType::Income, "Salary").await;
        record(&mut state, &owner, 1.0, date!(2023 - 07 - 01), TransactionType::Income, "Salary").await;

        let years = state.report_store.history_periods(&owner).await.unwrap();

        assert_eq!(years, vec![2023, 2025]);
    }

    #[tokio::test]
    async fn history_periods_falls_back_to_the_current_year() {
        let state = get_app_state();
        let owner = OwnerId::new_unchecked("user_1");

        let years = state.report_store.history_periods(&owner).await.unwrap();

        assert_eq!(years, vec![OffsetDateTime::now_utc().year()]);
    }

    #[tokio::test]
    async fn year_history_has_twelve_zero_filled_slots() {
        let (state, owner) = seeded_state().await;

        let entries = state
            .report_store
            .history_data(&owner, Timeframe::Year, Period { year: 2024, month: 0 })
            .await
            .unwrap();

        assert_eq!(entries.len(), 12);
        // March (slot 2) and April (slot 3) hold the seeded totals.
        assert_eq!(entries[2].income, 2500.0);
        assert_eq!(entries[2].expense, 100.0);
        assert_eq!(entries[3].income, 2500.0);
        assert_eq!(entries[3].expense, 0.0);
        for (month, entry) in entries.iter().enumerate() {
            assert_eq!(entry.month, month as u8);
            assert_eq!(entry.day, None);
            if !(2..=3).contains(&month) {
                assert_eq!((entry.income, entry.expense), (0.0, 0.0));
            }
        }
    }

    #[tokio::test]
    async fn month_history_has_one_slot_per_calendar_day() {
        let (state, owner) = seeded_state().await;

        let march = state
            .report_store
            .history_data(&owner, Timeframe::Month, Period { year: 2024, month: 2 })
            .await
            .unwrap();

        assert_eq!(march.len(), 31);
        assert_eq!(march[0].day, Some(1));
        assert_eq!(march[0].income, 2500.0);
        assert_eq!(march[14].expense, 80.0);
        assert_eq!(march[30].expense, 20.0);
        assert_eq!((march[1].income, march[1].expense), (0.0, 0.0));
    }

    #[tokio::test]
    async fn month_history_uses_the_true_day_count() {
        let state = get_app_state();
        let owner = OwnerId::new_unchecked("user_1");

        // February: leap year, common year, and two boundary lengths.
        for (year, month, expected_days) in
            [(2024, 1, 29), (2023, 1, 28), (2024, 3, 30), (2024, 11, 31)]
        {
            let entries = state
                .report_store
                .history_data(&owner, Timeframe::Month, Period { year, month })
                .await
                .unwrap();

            assert_eq!(entries.len(), expected_days, "{year}/{month}");
        }
    }

    #[tokio::test]
    async fn month_history_rejects_out_of_range_months() {
        let state = get_app_state();
        let owner = OwnerId::new_unchecked("user_1");

        let result = state
            .report_store
            .history_data(&owner, Timeframe::Month, Period { year: 2024, month: 12 })
            .await;

        assert_eq!(result, Err(Error::InvalidMonth(12)));
    }

    #[tokio::test]
    async fn transaction_history_is_date_descending_and_formatted() {
        let (state, owner) = seeded_state().await;

        let records = state
            .report_store
            .transaction_history(&owner, date!(2024 - 03 - 01), date!(2024 - 04 - 30))
            .await
            .unwrap();

        let dates: Vec<Date> = records
            .iter()
            .map(|record| record.transaction.date)
            .collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 04 - 01),
                date!(2024 - 03 - 31),
                date!(2024 - 03 - 15),
                date!(2024 - 03 - 01),
            ]
        );
        // No settings row yet: amounts fall back to the default currency.
        assert_eq!(records[0].formatted_amount, "$2,500.00");
        assert_eq!(records[2].formatted_amount, "$80.00");
    }

    #[tokio::test]
    async fn transaction_history_uses_the_owner_currency() {
        let (mut state, owner) = seeded_state().await;
        state
            .settings_store
            .update_currency(&owner, "JPY")
            .await
            .unwrap();

        let records = state
            .report_store
            .transaction_history(&owner, date!(2024 - 04 - 01), date!(2024 - 04 - 30))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].formatted_amount, "¥2,500");
    }

    #[tokio::test]
    async fn reports_are_scoped_to_the_owner() {
        let (state, _) = seeded_state().await;
        let stranger = OwnerId::new_unchecked("user_2");

        let stats = state
            .report_store
            .balance_stats(&stranger, date!(2024 - 01 - 01), date!(2024 - 12 - 31))
            .await
            .unwrap();
        let records = state
            .report_store
            .transaction_history(&stranger, date!(2024 - 01 - 01), date!(2024 - 12 - 31))
            .await
            .unwrap();

        assert_eq!(
            stats,
            BalanceStats {
                income: 0.0,
                expense: 0.0
            }
        );
        assert!(records.is_empty());
    }
}
