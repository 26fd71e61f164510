// src/report.rs

use serde::Serialize;

use crate::{
    config::REPORT_SUBJECT,
    grading::{MissRecord, ScoringResult},
    models::question::Content,
    utils::{html::escape_text, media::MediaResolver},
};

/// Rendered result email, plus the structured fields it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub subject: String,
    pub headline: String,
    pub correct_count: usize,
    pub total_questions: usize,
    pub banded_score: u32,

    /// Question and correct choice per miss, in question order.
    pub remediation: Vec<MissRecord>,

    /// HTML body of the email.
    pub html: String,
}

/// Builds the report for one graded submission. Pure; never fails.
pub fn build(result: &ScoringResult, total_questions: usize, media: &MediaResolver) -> ReportDocument {
    let headline = format!("Your score is {}/{}.", result.correct_count, total_questions);

    let mut html = String::new();
    html.push_str(&format!("<h2>{}</h2>", headline));
    html.push_str(&format!("<h3>Banded score: {}</h3>", result.banded_score));

    if result.miss_records.is_empty() {
        html.push_str("<p>You answered every question correctly. Congratulations!</p>");
    } else {
        html.push_str("<h3>Correct answers for the questions you missed:</h3>");
        for miss in &result.miss_records {
            render_miss(&mut html, miss, media);
        }
    }

    ReportDocument {
        subject: REPORT_SUBJECT.to_string(),
        headline,
        correct_count: result.correct_count,
        total_questions,
        banded_score: result.banded_score,
        remediation: result.miss_records.clone(),
        html,
    }
}

fn render_miss(html: &mut String, miss: &MissRecord, media: &MediaResolver) {
    html.push_str("<div>");
    html.push_str(&format!("<h4>Q{}</h4>", miss.question_number));
    render_content(html, &miss.question_content, "Question image", 300, media);
    html.push_str("<p>Correct answer:</p>");
    render_content(html, &miss.correct_choice_content, "Correct answer image", 150, media);
    html.push_str("</div><hr>");
}

fn render_content(html: &mut String, content: &Content, alt: &str, width: u32, media: &MediaResolver) {
    match content {
        Content::Text(text) => {
            html.push_str(&format!("<p>{}</p>", escape_text(text)));
        }
        Content::Image(path) => {
            html.push_str(&format!(
                r#"<img src="{}" alt="{}" style="width: {}px; display: block;">"#,
                media.resolve(path),
                alt,
                width
            ));
        }
    }
}
