//! Card catalog
//!
//! The cards behind the passcode gate, embedded as JSON and validated once
//! at boot. Read-only for the whole session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quiz::Quiz;

/// Built-in catalog
const CARDS_JSON: &str = include_str!("../content/cards.json");

/// One block of the memory story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoryBlock {
    /// Lines rendered as one paragraph
    Paragraph { lines: Vec<String> },
    /// A photo
    Image { src: String, alt: String },
    /// Closing paragraphs, styled apart from the rest
    Conclusion { lines: Vec<String> },
}

/// Card payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardBody {
    /// Static text
    Text {
        paragraphs: Vec<String>,
        #[serde(default)]
        heading: Option<String>,
        #[serde(default)]
        bullets: Vec<String>,
        #[serde(default)]
        closing: Option<String>,
    },
    Quiz { quiz: Quiz },
    /// Story generated into the page when the card is opened
    Memory { story: Vec<StoryBlock> },
}

/// A content descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub icon: String,
    pub title: String,
    pub body: CardBody,
}

/// Why a catalog failed to load
#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    Empty,
    QuestionWithoutOptions { card: usize, question: usize },
    CorrectOutOfRange { card: usize, question: usize, correct: usize, options: usize },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "card catalog is not valid JSON: {e}"),
            CatalogError::Empty => write!(f, "card catalog has no cards"),
            CatalogError::QuestionWithoutOptions { card, question } => {
                write!(f, "card {card} question {question} has no options")
            }
            CatalogError::CorrectOutOfRange { card, question, correct, options } => write!(
                f,
                "card {card} question {question}: correct index {correct} but only {options} options"
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

/// Ordered, validated cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    /// The catalog shipped with the page
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(CARDS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<Card>) -> Result<Self, CatalogError> {
        if cards.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (card_idx, card) in cards.iter().enumerate() {
            let CardBody::Quiz { quiz } = &card.body else {
                continue;
            };
            for (q_idx, q) in quiz.questions.iter().enumerate() {
                if q.options.is_empty() {
                    return Err(CatalogError::QuestionWithoutOptions {
                        card: card_idx,
                        question: q_idx,
                    });
                }
                if q.correct >= q.options.len() {
                    return Err(CatalogError::CorrectOutOfRange {
                        card: card_idx,
                        question: q_idx,
                        correct: q.correct,
                        options: q.options.len(),
                    });
                }
            }
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Index of the first quiz card
    pub fn quiz_card(&self) -> Option<usize> {
        self.cards
            .iter()
            .position(|c| matches!(c.body, CardBody::Quiz { .. }))
    }
}
