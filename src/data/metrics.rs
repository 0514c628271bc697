//! Engagement metric derivation.
//!
//! - `engagement_rate_likes = (likes + dislikes) / views`
//! - `engagement_rate_comments = comment_count / views`
//!
//! With `views == 0` both rates are undefined (`None`) and every downstream
//! mean, summary, correlation and ANOVA skips them.

use log::debug;

use crate::data::clean::CleanedDataset;
use crate::domain::{CleanVideo, Dataset, TrendingVideo};

/// Add engagement rates to one clean row.
pub fn derive_metrics(video: CleanVideo) -> TrendingVideo {
    let (engagement_rate_likes, engagement_rate_comments) = if video.views == 0 {
        (None, None)
    } else {
        let views = video.views as f64;
        (
            Some((video.likes + video.dislikes) as f64 / views),
            Some(video.comment_count as f64 / views),
        )
    };

    TrendingVideo {
        video,
        engagement_rate_likes,
        engagement_rate_comments,
    }
}

/// Enrich a cleaned dataset.
pub fn enrich_dataset(cleaned: CleanedDataset) -> Dataset {
    let videos: Vec<TrendingVideo> = cleaned.rows.into_iter().map(derive_metrics).collect();

    let undefined = videos
        .iter()
        .filter(|v| v.engagement_rate_likes.is_none())
        .count();
    if undefined > 0 {
        debug!(
            "{}: {undefined} rows with zero views have undefined engagement rates",
            cleaned.country
        );
    }

    Dataset {
        country: cleaned.country,
        videos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn video(views: u64, likes: u64, dislikes: u64, comment_count: i64) -> CleanVideo {
        CleanVideo {
            video_id: "x".to_string(),
            trending_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            category_id: 10,
            views,
            likes,
            dislikes,
            comment_count,
        }
    }

    #[test]
    fn worked_example() {
        let v = derive_metrics(video(100, 10, 5, 20));
        assert!((v.engagement_rate_likes.unwrap() - 0.15).abs() < 1e-12);
        assert!((v.engagement_rate_comments.unwrap() - 0.20).abs() < 1e-12);
    }

    #[test]
    fn zero_views_leaves_rates_undefined() {
        let v = derive_metrics(video(0, 3, 1, 2));
        assert_eq!(v.engagement_rate_likes, None);
        assert_eq!(v.engagement_rate_comments, None);
    }

    #[test]
    fn enrich_keeps_row_order() {
        let cleaned = CleanedDataset {
            country: crate::domain::CountryCode::Fr,
            rows: vec![video(10, 1, 0, 0), video(0, 0, 0, 0), video(4, 1, 1, 1)],
            dropped: 0,
        };
        let ds = enrich_dataset(cleaned);
        assert_eq!(ds.videos.len(), 3);
        assert_eq!(ds.videos[0].engagement_rate_likes, Some(0.1));
        assert_eq!(ds.videos[1].engagement_rate_likes, None);
        assert_eq!(ds.videos[2].engagement_rate_comments, Some(0.25));
    }
}
