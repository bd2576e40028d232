//! HTML fragments for the DOM presenter
//!
//! Pure string builders so the markup can be checked without a browser.
//! Every interactive element carries a `data-action` attribute; the web
//! binding routes clicks by it.

use std::fmt::Write;

use crate::cards::{Card, CardBody, StoryBlock};
use crate::quiz::{Feedback, QuestionView, Summary};

pub const GATE_ACCEPTED: &str = "✓ Correct!";
pub const GATE_REJECTED: &str = "✗ Wrong passcode";

pub const COLOR_SUCCESS: &str = "#10b981";
pub const COLOR_ERROR: &str = "#db2777";

pub const OPTION_RIGHT_BG: &str = "linear-gradient(135deg, #86efac, #10b981)";
pub const OPTION_WRONG_BG: &str = "linear-gradient(135deg, #fca5a5, #dc2626)";
pub const OPTION_RIGHT_BORDER: &str = "#10b981";
pub const OPTION_WRONG_BORDER: &str = "#dc2626";

/// Escape text for element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Tile on the cards grid
pub fn card_tile(index: usize, card: &Card) -> String {
    format!(
        r#"<button class="card" data-action="open-card" data-card="{index}"><span class="card-icon">{}</span><span class="card-title">{}</span></button>"#,
        escape(&card.icon),
        escape(&card.title)
    )
}

/// Page container for card `index`; quiz and memory cards get an empty
/// slot filled when the card is opened
pub fn card_page(index: usize, card: &Card) -> String {
    let mut body = String::new();
    match &card.body {
        CardBody::Text {
            paragraphs,
            heading,
            bullets,
            closing,
        } => {
            for p in paragraphs {
                let _ = write!(body, "<p>{}</p>", escape(p));
            }
            if let Some(heading) = heading {
                let _ = write!(body, "<h3>{}</h3>", escape(heading));
            }
            if !bullets.is_empty() {
                body.push_str("<ul>");
                for b in bullets {
                    let _ = write!(body, "<li>{}</li>", escape(b));
                }
                body.push_str("</ul>");
            }
            if let Some(closing) = closing {
                let _ = write!(body, r#"<p class="closing">{}</p>"#, escape(closing));
            }
        }
        CardBody::Quiz { .. } => body.push_str(r#"<div id="quizContent"></div>"#),
        CardBody::Memory { .. } => body.push_str(r#"<div id="memoryContent"></div>"#),
    }

    format!(
        r#"<div class="page card-page" id="card{index}Page"><div class="container"><button class="btn-back" data-action="back">← Back</button><h2 class="card-page-title">{} {}</h2><div class="card-page-body">{body}</div></div></div>"#,
        escape(&card.icon),
        escape(&card.title)
    )
}

pub fn question(view: &QuestionView<'_>) -> String {
    let mut options = String::new();
    for (i, option) in view.question.options.iter().enumerate() {
        let _ = write!(
            options,
            r#"<button class="quiz-option" data-action="answer" data-answer="{i}">{}</button>"#,
            escape(option)
        );
    }
    format!(
        r#"<div class="quiz-container"><div class="quiz-progress">Question {}/{}</div><div class="quiz-question-box"><h3 class="quiz-question">{}</h3><div class="quiz-options">{options}</div></div><div id="quizFeedback" class="quiz-feedback"></div></div>"#,
        view.number,
        view.total,
        escape(&view.question.question)
    )
}

pub fn feedback(feedback: &Feedback) -> String {
    if feedback.is_correct() {
        format!(r#"<span style="color: {COLOR_SUCCESS};">✓ Correct!</span>"#)
    } else {
        format!(r#"<span style="color: {COLOR_ERROR};">✗ Not quite</span>"#)
    }
}

pub fn summary(summary: &Summary) -> String {
    format!(
        r#"<div class="quiz-result"><div class="quiz-result-emoji">{}</div><h3>Your score</h3><div class="quiz-score">{}/{}</div><p class="quiz-result-message">{}</p><button class="btn-quiz-retry" data-action="retry">Try again</button></div>"#,
        summary.band.emoji(),
        summary.correct,
        summary.total,
        summary.band.message()
    )
}

pub fn story(blocks: &[StoryBlock]) -> String {
    let mut out = String::from(r#"<div class="memory-story-card"><div class="memory-story-content">"#);
    for block in blocks {
        match block {
            StoryBlock::Paragraph { lines } => {
                let lines: Vec<String> = lines.iter().map(|l| escape(l)).collect();
                let _ = write!(out, r#"<p class="story-paragraph">{}</p>"#, lines.join("<br>"));
            }
            StoryBlock::Image { src, alt } => {
                let _ = write!(
                    out,
                    r#"<div class="story-image"><img src="{}" alt="{}" loading="lazy"></div>"#,
                    escape(src),
                    escape(alt)
                );
            }
            StoryBlock::Conclusion { lines } => {
                out.push_str(r#"<div class="story-conclusion">"#);
                for line in lines {
                    let _ = write!(out, "<p>{}</p>", escape(line));
                }
                out.push_str("</div>");
            }
        }
    }
    out.push_str("</div></div>");
    out
}
