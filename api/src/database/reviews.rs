use super::types::Database;
use crate::listing::{ImageService, RatingService};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
impl RatingService for Database {
    async fn average_rating(&self, activity_id: i64) -> Result<f64> {
        let average: Option<f64> =
            sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE activity_id = ?")
                .bind(activity_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(average.unwrap_or(0.0))
    }
}

#[async_trait]
impl ImageService for Database {
    async fn image_url(&self, activity_id: i64) -> Result<Option<String>> {
        let url: Option<String> = sqlx::query_scalar(
            "SELECT url FROM activity_images WHERE activity_id = ? ORDER BY position ASC, id ASC LIMIT 1",
        )
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(url)
    }
}
