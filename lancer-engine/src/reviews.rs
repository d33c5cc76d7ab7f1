//! Reviews between clients and freelancers.

use std::sync::Arc;

use lancer_core::errors::{MarketError, MarketResult};
use lancer_core::types::review::Review;
use lancer_core::{ProjectId, ReviewId, UserId};
use lancer_storage::queries::{reviews, users};
use lancer_storage::MarketStore;

pub struct ReviewBook {
    store: Arc<MarketStore>,
}

impl ReviewBook {
    pub fn new(store: Arc<MarketStore>) -> Self {
        Self { store }
    }

    /// Leave a 1-5 star review.
    pub fn post(
        &self,
        reviewer: UserId,
        reviewee: UserId,
        project: Option<ProjectId>,
        rating: u8,
        comment: Option<&str>,
    ) -> MarketResult<ReviewId> {
        if !(1..=5).contains(&rating) {
            return Err(MarketError::InvalidRating { rating: i32::from(rating) });
        }
        self.store.with_tx(|conn| {
            users::get(conn, reviewer)?
                .ok_or(MarketError::not_found("user", reviewer.raw()))?;
            users::get(conn, reviewee)?
                .ok_or(MarketError::not_found("user", reviewee.raw()))?;
            Ok(reviews::insert(conn, reviewer, reviewee, project, rating, comment)?)
        })
    }

    pub fn list_for_user(&self, reviewee: UserId) -> MarketResult<Vec<Review>> {
        self.store.reviews_for_user(reviewee)
    }

    pub fn average_rating(&self, reviewee: UserId) -> MarketResult<Option<f64>> {
        self.store.average_rating(reviewee)
    }
}
