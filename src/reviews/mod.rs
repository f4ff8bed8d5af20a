//! Per-trail review ledger.
//!
//! Reviews accumulate most-recent-first; there is no delete operation. Only
//! the `helpful` counter of a stored review ever changes.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::errors::ValidationError;
use crate::models::{round_tenth, CreateReviewRequest, Review};

const SEED_REVIEWS: &str = include_str!("../../data/seed_reviews.json");

pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Default)]
pub struct ReviewLedger {
    by_trail: HashMap<i64, Vec<Review>>,
    /// Highest id ever handed out or loaded; ids are never reused.
    last_id: i64,
}

impl ReviewLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored reviews, restoring most-recent-first order
    /// (date, then id, descending).
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        let mut ledger = Self::new();
        for review in reviews {
            ledger.last_id = ledger.last_id.max(review.id);
            ledger.by_trail.entry(review.trail_id).or_default().push(review);
        }
        for list in ledger.by_trail.values_mut() {
            list.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        }
        ledger
    }

    /// Validate and record a review dated today.
    pub fn add(&mut self, trail_id: i64, request: &CreateReviewRequest) -> Result<Review, ValidationError> {
        self.add_on(trail_id, request, Utc::now().date_naive())
    }

    pub fn add_on(
        &mut self,
        trail_id: i64,
        request: &CreateReviewRequest,
        date: NaiveDate,
    ) -> Result<Review, ValidationError> {
        let new = request.validate()?;

        self.last_id += 1;
        let review = Review {
            id: self.last_id,
            trail_id,
            author: new.author,
            rating: new.rating,
            comment: new.comment,
            date,
            helpful: 0,
        };

        self.by_trail.entry(trail_id).or_default().insert(0, review.clone());
        tracing::debug!("Review {} added to trail {}", review.id, trail_id);
        Ok(review)
    }

    /// Increment a review's helpful counter; `None` when it does not exist.
    pub fn mark_helpful(&mut self, review_id: i64, trail_id: i64) -> Option<Review> {
        let review = self
            .by_trail
            .get_mut(&trail_id)?
            .iter_mut()
            .find(|r| r.id == review_id)?;
        review.helpful = review.helpful.saturating_add(1);
        Some(review.clone())
    }

    /// Mean rating rounded to one decimal, 0 without reviews.
    pub fn average_rating(&self, trail_id: i64) -> f64 {
        let reviews = self.for_trail(trail_id);
        if reviews.is_empty() {
            return 0.0;
        }
        let total: u32 = reviews.iter().map(|r| r.rating as u32).sum();
        round_tenth(total as f64 / reviews.len() as f64)
    }

    pub fn count(&self, trail_id: i64) -> usize {
        self.for_trail(trail_id).len()
    }

    /// Reviews of one trail, most recent first.
    pub fn for_trail(&self, trail_id: i64) -> &[Review] {
        self.by_trail.get(&trail_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Newest reviews across all trails. Same-day reviews are ordered by
    /// submission, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Review> {
        let mut all: Vec<Review> = self.by_trail.values().flatten().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        all.truncate(limit);
        all
    }

    pub fn by_min_rating(&self, trail_id: i64, min_rating: u8) -> Vec<Review> {
        self.for_trail(trail_id)
            .iter()
            .filter(|r| r.rating >= min_rating)
            .cloned()
            .collect()
    }

    /// `(trail_id, average, count)` for every trail with reviews.
    pub fn aggregates(&self) -> Vec<(i64, f64, usize)> {
        self.by_trail
            .iter()
            .filter(|(_, reviews)| !reviews.is_empty())
            .map(|(&trail_id, reviews)| (trail_id, self.average_rating(trail_id), reviews.len()))
            .collect()
    }
}

/// Sample reviews used when storage holds none.
pub fn seed_reviews() -> Vec<Review> {
    serde_json::from_str(SEED_REVIEWS).unwrap_or_else(|e| {
        tracing::error!("Seed review data is corrupt: {}", e);
        Vec::new()
    })
}
