//! Borrow management service and the accrued-cost calculator

use chrono::{NaiveDate, Utc};

use crate::{
    config::BorrowsConfig,
    error::{AppError, AppResult},
    models::borrow::{BorrowDetails, CreateBorrow},
    repository::Repository,
};

/// Cost accrued by a borrow, evaluated against `today` for open records.
///
/// The historical implementation computed `issue - end`, which yields a
/// non-positive value for any forward-dated borrow. That was a sign
/// inversion, not a pricing policy; this calculator charges
/// `(end - issue) in days * cost_per_day`.
pub fn cost_as_of(
    issue_date: NaiveDate,
    return_date: Option<NaiveDate>,
    today: NaiveDate,
    cost_per_day: i64,
) -> i64 {
    let end = return_date.unwrap_or(today);
    (end - issue_date).num_days() * cost_per_day
}

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    config: BorrowsConfig,
}

impl BorrowsService {
    pub fn new(repository: Repository, config: BorrowsConfig) -> Self {
        Self { repository, config }
    }

    /// Accrued cost for a borrow, using today as the end date while open
    pub fn cost(&self, issue_date: NaiveDate, return_date: Option<NaiveDate>) -> i64 {
        cost_as_of(
            issue_date,
            return_date,
            Utc::now().date_naive(),
            self.config.cost_per_day,
        )
    }

    /// Get a borrow record with accrued cost
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowDetails> {
        let joined = self.repository.borrows.get_joined(id).await?;
        let cost = self.cost(joined.issue_date, joined.return_date);
        Ok(joined.into_details(cost))
    }

    /// Get all borrows for a user, with accrued costs
    pub async fn get_user_borrows(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        self.repository.users.get_by_id(user_id).await?;

        let joined = self.repository.borrows.get_user_borrows(user_id).await?;
        Ok(joined
            .into_iter()
            .map(|j| {
                let cost = self.cost(j.issue_date, j.return_date);
                j.into_details(cost)
            })
            .collect())
    }

    /// Issue a book to a user
    pub async fn create(&self, borrow: CreateBorrow) -> AppResult<BorrowDetails> {
        self.repository.users.get_by_id(borrow.user_id).await?;
        self.repository.books.get_by_id(borrow.book_id).await?;

        let today = Utc::now().date_naive();
        let issue_date = borrow.issue_date.unwrap_or(today);

        // Keeps return_date (today at close) from preceding issue_date
        if issue_date > today {
            return Err(AppError::Validation(
                "Issue date must not be in the future".to_string(),
            ));
        }

        if self.repository.borrows.book_is_borrowed(borrow.book_id).await? {
            return Err(AppError::BusinessRule("Book is already borrowed".to_string()));
        }

        let id = self
            .repository
            .borrows
            .create(borrow.book_id, borrow.user_id, issue_date)
            .await?;

        tracing::info!(borrow_id = id, book_id = borrow.book_id, user_id = borrow.user_id, "Book issued");

        self.get_details(id).await
    }

    /// Close an open borrow, setting its return date to today
    pub async fn return_borrow(&self, id: i32) -> AppResult<BorrowDetails> {
        let record = self.repository.borrows.get_by_id(id).await?;

        if !record.is_open() {
            return Err(AppError::AlreadyReturned(
                "Borrow record is already returned".to_string(),
            ));
        }

        let today = Utc::now().date_naive();
        self.repository.borrows.set_return_date(id, today).await?;

        tracing::info!(borrow_id = id, "Book returned");

        self.get_details(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn open_borrow_accrues_against_today() {
        // Spec example: issued 2024-01-01, evaluated on 2024-01-10
        let cost = cost_as_of(date(2024, 1, 1), None, date(2024, 1, 10), 1);
        assert_eq!(cost, 9);
        // The legacy subtraction order would have produced the negation
        assert_eq!(-cost, (date(2024, 1, 1) - date(2024, 1, 10)).num_days());
    }

    #[test]
    fn open_borrow_equals_closed_today() {
        let issue = date(2024, 3, 5);
        let today = date(2024, 3, 20);
        assert_eq!(
            cost_as_of(issue, None, today, 1),
            cost_as_of(issue, Some(today), today, 1)
        );
    }

    #[test]
    fn closed_borrow_ignores_today() {
        let issue = date(2024, 1, 1);
        let returned = date(2024, 1, 8);
        let cost = cost_as_of(issue, Some(returned), date(2024, 6, 1), 1);
        assert_eq!(cost, 7);
    }

    #[test]
    fn same_day_return_costs_nothing() {
        let d = date(2024, 2, 29);
        assert_eq!(cost_as_of(d, Some(d), d, 1), 0);
        assert_eq!(cost_as_of(d, None, d, 1), 0);
    }

    #[test]
    fn cost_scales_with_rate() {
        let issue = date(2024, 1, 1);
        let returned = date(2024, 1, 11);
        assert_eq!(cost_as_of(issue, Some(returned), returned, 3), 30);
        assert_eq!(cost_as_of(issue, Some(returned), returned, 0), 0);
    }

    #[test]
    fn cost_spans_month_boundaries() {
        let cost = cost_as_of(date(2023, 12, 25), Some(date(2024, 1, 5)), date(2024, 1, 5), 1);
        assert_eq!(cost, 11);
    }
}
