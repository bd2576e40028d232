//! Fixed-question quiz engine
//!
//! Walks an ordered question list, takes one answer per question and bands
//! the final score.

use serde::{Deserialize, Serialize};

use crate::consts::QUIZ_GOOD_PERCENT;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
}

/// An ordered question list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
}

/// Summary banding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Every answer right
    Perfect,
    /// At least `QUIZ_GOOD_PERCENT`
    Good,
    KeepTrying,
}

impl Band {
    pub fn message(&self) -> &'static str {
        match self {
            Band::Perfect => "Amazing! You know me so well 💕",
            Band::Good => "Great job! You really get me 😊",
            Band::KeepTrying => "That's okay, we'll keep getting to know each other 💕",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Band::Perfect => "🎉",
            Band::Good => "💖",
            Band::KeepTrying => "🤗",
        }
    }
}

/// Final result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub correct: usize,
    pub total: usize,
    pub percent: f32,
    pub band: Band,
}

impl Summary {
    pub fn new(correct: usize, total: usize) -> Self {
        let band = if total == 0 {
            Band::KeepTrying
        } else if correct == total {
            Band::Perfect
        } else if correct * 100 >= QUIZ_GOOD_PERCENT as usize * total {
            Band::Good
        } else {
            Band::KeepTrying
        };
        let percent = if total == 0 {
            0.0
        } else {
            correct as f32 / total as f32 * 100.0
        };
        Self {
            correct,
            total,
            percent,
            band,
        }
    }
}

/// A question ready to display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionView<'a> {
    /// 1-based
    pub number: usize,
    pub total: usize,
    pub question: &'a Question,
}

/// Marking for an answered question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub selected: usize,
    pub correct: usize,
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}

/// What to show after moving on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    Question(QuestionView<'a>),
    Finished(Summary),
}

/// Quiz progress; owns its index and running counter
#[derive(Debug, Clone)]
pub struct QuizEngine {
    quiz: Quiz,
    index: usize,
    correct: usize,
    answered: bool,
}

impl QuizEngine {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            index: 0,
            correct: 0,
            answered: false,
        }
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn correct_so_far(&self) -> usize {
        self.correct
    }

    /// Start over from the first question
    pub fn reset(&mut self) {
        self.index = 0;
        self.correct = 0;
        self.answered = false;
    }

    /// The question awaiting (or showing) an answer
    pub fn current(&self) -> Option<QuestionView<'_>> {
        self.quiz.questions.get(self.index).map(|question| QuestionView {
            number: self.index + 1,
            total: self.total(),
            question,
        })
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// Answer the current question.
    ///
    /// Only the first selection per question counts; later ones, and
    /// indices outside the option list, return `None`.
    pub fn select(&mut self, choice: usize) -> Option<Feedback> {
        if self.answered {
            return None;
        }
        let question = self.quiz.questions.get(self.index)?;
        if choice >= question.options.len() {
            return None;
        }

        self.answered = true;
        let feedback = Feedback {
            selected: choice,
            correct: question.correct,
        };
        if feedback.is_correct() {
            self.correct += 1;
        }
        Some(feedback)
    }

    /// Move past an answered question
    pub fn advance(&mut self) -> Step<'_> {
        if self.answered && self.index < self.total() {
            self.index += 1;
            self.answered = false;
        }
        match self.quiz.questions.get(self.index) {
            Some(question) => Step::Question(QuestionView {
                number: self.index + 1,
                total: self.total(),
                question,
            }),
            None => Step::Finished(self.summary()),
        }
    }

    pub fn summary(&self) -> Summary {
        Summary::new(self.correct, self.total())
    }
}
