//! Review model and the submission request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A user-submitted rating and comment attached to a trail.
///
/// Immutable once created, except for the `helpful` counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub trail_id: i64,
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub helpful: u32,
}

/// Request body for submitting a review.
///
/// Fields are kept as raw JSON so a missing or wrongly typed field is
/// reported as a validation error naming it, not as a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub comment: Option<Value>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub author: String,
    pub rating: u8,
    pub comment: String,
}

impl CreateReviewRequest {
    pub fn new(author: &str, rating: i64, comment: &str) -> Self {
        Self {
            author: Some(Value::from(author)),
            rating: Some(Value::from(rating)),
            comment: Some(Value::from(comment)),
        }
    }

    pub fn validate(&self) -> Result<NewReview, ValidationError> {
        let author = required_text(self.author.as_ref(), "author", "Reviewer name is required")?;
        let rating = rating(self.rating.as_ref())?;
        let comment = required_text(self.comment.as_ref(), "comment", "Comment is required")?;

        Ok(NewReview {
            author,
            rating,
            comment,
        })
    }
}

fn required_text(
    value: Option<&Value>,
    field: &'static str,
    message: &str,
) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::new(field, message)),
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Value::String(_)) => Err(ValidationError::new(field, message)),
        Some(_) => Err(ValidationError::new(field, format!("{} must be text", field))),
    }
}

/// Whole numbers 1-5, given as a JSON integer or an integer string.
fn rating(value: Option<&Value>) -> Result<u8, ValidationError> {
    let raw = match value {
        None | Some(Value::Null) => return Err(ValidationError::new("rating", "Rating is required")),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match raw {
        Some(r) if (MIN_RATING as i64..=MAX_RATING as i64).contains(&r) => Ok(r as u8),
        Some(r) => Err(ValidationError::new(
            "rating",
            format!("Rating must be between {} and {}, got {}", MIN_RATING, MAX_RATING, r),
        )),
        None => Err(ValidationError::new("rating", "Rating must be a whole number")),
    }
}

/// Result of a successful submission, with the trail's refreshed aggregate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub review: Review,
    pub average_rating: f64,
    pub review_count: usize,
}
