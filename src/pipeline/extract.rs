//! Mapping raw source items to flat records.

use crate::models::{
    DiscussionRecord, NewsHit, NewsRecord, NormalizedRecord, RawItem, Submission,
    UNKNOWN_COMMENT_AUTHOR,
};

/// Normalize one raw item.
///
/// A submission yields one record per comment (none if it has no comments);
/// a news hit always yields exactly one.
pub fn extract(item: &RawItem) -> Vec<NormalizedRecord> {
    match item {
        RawItem::Submission(submission) => extract_submission(submission)
            .into_iter()
            .map(NormalizedRecord::from)
            .collect(),
        RawItem::NewsHit(hit) => vec![extract_news_hit(hit).into()],
    }
}

pub fn extract_submission(submission: &Submission) -> Vec<DiscussionRecord> {
    submission
        .comments
        .iter()
        .map(|comment| DiscussionRecord {
            title: submission.title.clone(),
            url: submission.url.clone(),
            score: submission.score,
            created: submission.created_utc,
            subreddit: submission.subreddit.clone(),
            submission_content: submission.selftext.clone(),
            comment: comment.body.clone(),
            comment_author: comment
                .author
                .clone()
                .unwrap_or_else(|| UNKNOWN_COMMENT_AUTHOR.to_string()),
        })
        .collect()
}

pub fn extract_news_hit(hit: &NewsHit) -> NewsRecord {
    let view = hit.view();
    NewsRecord {
        title: view.title(),
        text: view.highlighted_text(),
        story_date: view.story_date(),
        matched_keywords: view.matched_words().join(", "),
        url: view.url(),
        author: view.author(),
    }
}
