//! Pure cash-flow aggregation over already-loaded records.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;

use super::types::{CashChannel, DailyCashFlow, ExpenseSummary, MonthlyCashFlow, PaymentMethodTotal};
use crate::currency::round2;
use crate::records::{Expense, Income};

#[derive(Debug, Clone, Copy, Default)]
struct DayBucket {
    income_account: Decimal,
    income_cash_bs: Decimal,
    income_cash_usd: Decimal,
    expense_account: Decimal,
    expense_cash_bs: Decimal,
    expense_cash_usd: Decimal,
}

/// Builds cash-flow reports.
pub struct CashFlowReport;

impl CashFlowReport {
    /// First and last day of a month.
    pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "Month must be between 1 and 12, got {month}"
            )));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::Validation(format!("Invalid year {year}")))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last = next
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .ok_or_else(|| AppError::Validation(format!("Invalid year {year}")))?;
        Ok((first, last))
    }

    /// Daily report of `year`/`month` with every day present, ascending.
    ///
    /// Records dated outside the month and unpaid expenses are ignored.
    /// Expenses whose payment method maps to no [`CashChannel`] are ignored too.
    pub fn build(
        year: i32,
        month: u32,
        incomes: &[Income],
        expenses: &[Expense],
    ) -> AppResult<MonthlyCashFlow> {
        let (first, last) = Self::month_bounds(year, month)?;

        let mut buckets: BTreeMap<NaiveDate, DayBucket> = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|d| (d, DayBucket::default()))
            .collect();

        for income in incomes {
            let Some(bucket) = buckets.get_mut(&income.date) else {
                continue;
            };
            bucket.income_account += income.channels.account_total();
            bucket.income_cash_bs += income.channels.efectivo_bs;
            bucket.income_cash_usd += income.channels.efectivo_dolares;
        }

        for expense in expenses.iter().filter(|e| e.paid) {
            let Some(bucket) = buckets.get_mut(&expense.date) else {
                continue;
            };
            match CashChannel::from_payment_method(&expense.payment_method) {
                Some(CashChannel::Account) => bucket.expense_account += expense.amount_bs,
                Some(CashChannel::CashBs) => bucket.expense_cash_bs += expense.amount_bs,
                Some(CashChannel::CashUsd) => bucket.expense_cash_usd += expense.amount_dollars,
                None => {}
            }
        }

        let mut accumulated = Decimal::ZERO;
        let mut accumulated_account = Decimal::ZERO;
        let mut accumulated_cash_bs = Decimal::ZERO;
        let mut accumulated_cash_usd = Decimal::ZERO;

        let days = buckets
            .into_iter()
            .map(|(date, b)| {
                let net_account = b.income_account - b.expense_account;
                let net_cash_bs = b.income_cash_bs - b.expense_cash_bs;
                let net_cash_usd = b.income_cash_usd - b.expense_cash_usd;
                // Bs and USD do not add up; the combined net stays in Bs.
                let net = net_account + net_cash_bs;

                accumulated += net;
                accumulated_account += net_account;
                accumulated_cash_bs += net_cash_bs;
                accumulated_cash_usd += net_cash_usd;

                DailyCashFlow {
                    date,
                    income_account: b.income_account,
                    income_cash_bs: b.income_cash_bs,
                    income_cash_usd: b.income_cash_usd,
                    expense_account: b.expense_account,
                    expense_cash_bs: b.expense_cash_bs,
                    expense_cash_usd: b.expense_cash_usd,
                    net,
                    net_account,
                    net_cash_bs,
                    net_cash_usd,
                    accumulated,
                    accumulated_account,
                    accumulated_cash_bs,
                    accumulated_cash_usd,
                }
            })
            .collect();

        Ok(MonthlyCashFlow {
            year: first.year(),
            month: first.month(),
            days,
        })
    }

    /// Totals of the paid expenses dated within `[from, to]`.
    #[must_use]
    pub fn summarize_expenses(from: NaiveDate, to: NaiveDate, expenses: &[Expense]) -> ExpenseSummary {
        let mut by_method: BTreeMap<Option<String>, PaymentMethodTotal> = BTreeMap::new();
        let mut total_bs = Decimal::ZERO;
        let mut total_dollars = Decimal::ZERO;
        let mut count = 0u64;

        for expense in expenses
            .iter()
            .filter(|e| e.paid && e.date >= from && e.date <= to)
        {
            count += 1;
            total_bs += expense.amount_bs;
            total_dollars += expense.amount_dollars;

            let method = Some(expense.payment_method.trim())
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            let entry = by_method
                .entry(method.clone())
                .or_insert_with(|| PaymentMethodTotal {
                    payment_method: method,
                    count: 0,
                    total_bs: Decimal::ZERO,
                    total_dollars: Decimal::ZERO,
                });
            entry.count += 1;
            entry.total_bs += expense.amount_bs;
            entry.total_dollars += expense.amount_dollars;
        }

        ExpenseSummary {
            from,
            to,
            count,
            total_bs: round2(total_bs),
            total_dollars: round2(total_dollars),
            by_payment_method: by_method
                .into_values()
                .map(|t| PaymentMethodTotal {
                    total_bs: round2(t.total_bs),
                    total_dollars: round2(t.total_dollars),
                    ..t
                })
                .collect(),
        }
    }
}
