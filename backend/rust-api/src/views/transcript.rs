use std::borrow::Cow;

use crate::models::{History, HistoryEntry, Stage};
use crate::views::html_escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Learner,
    Tutor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody<'a> {
    Text(&'a str),
    /// A multiple-choice question. The correct answer is never carried here.
    Question {
        question: &'a str,
        choices: Vec<Cow<'a, str>>,
    },
}

/// One chat bubble in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock<'a> {
    pub speaker: Speaker,
    pub body: BlockBody<'a>,
}

impl<'a> MessageBlock<'a> {
    fn learner(text: &'a str) -> Self {
        Self {
            speaker: Speaker::Learner,
            body: BlockBody::Text(text),
        }
    }

    fn tutor(text: &'a str) -> Self {
        Self {
            speaker: Speaker::Tutor,
            body: BlockBody::Text(text),
        }
    }
}

/// Maps every transcript entry to its chat bubbles, in order.
pub fn render_blocks(history: &History) -> Vec<MessageBlock<'_>> {
    let mut blocks = Vec::with_capacity(history.len() * 2);

    for entry in history.entries() {
        let reply = match entry {
            HistoryEntry::User(text) => {
                blocks.push(MessageBlock::learner(text));
                continue;
            }
            HistoryEntry::Reply(reply) => reply,
        };

        match reply.stage() {
            Stage::Introduction { message, prompt } => {
                blocks.push(MessageBlock::tutor(message));
                blocks.push(MessageBlock::tutor(prompt));
            }
            Stage::Mcq {
                message,
                question,
                choices,
            } => {
                if let Some(feedback) = message.filter(|m| !m.is_empty()) {
                    blocks.push(MessageBlock::tutor(feedback));
                }
                blocks.push(MessageBlock {
                    speaker: Speaker::Tutor,
                    body: BlockBody::Question { question, choices },
                });
            }
            Stage::ConfidenceCheck { message } => blocks.push(MessageBlock::tutor(message)),
            // Terminal marker and unknown shapes have nothing to show.
            Stage::End | Stage::Unrecognized => {}
        }
    }

    blocks
}

const USER_AVATAR: &str = r#"<svg class="avatar avatar-user" width="32" height="32" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><circle cx="12" cy="8" r="5"/><path d="M20 21a8 8 0 0 0-16 0"/></svg>"#;

const BOT_AVATAR: &str = r#"<svg class="avatar avatar-bot" width="32" height="32" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><path d="M12 8V4H8"/><rect width="16" height="12" x="4" y="8" rx="2"/><path d="M2 14h2"/><path d="M20 14h2"/><path d="M15 13v2"/><path d="M9 13v2"/></svg>"#;

pub fn block_html(block: &MessageBlock<'_>) -> String {
    let (row_class, avatar, text_class) = match block.speaker {
        Speaker::Learner => ("message message-user", USER_AVATAR, "message-text text-user"),
        Speaker::Tutor => ("message message-bot", BOT_AVATAR, "message-text"),
    };

    let content = match &block.body {
        BlockBody::Text(text) => html_escape(text),
        BlockBody::Question { question, choices } => {
            let items: String = choices
                .iter()
                .map(|choice| format!("<li>{}</li>", html_escape(choice)))
                .collect();
            format!(
                r#"<span class="question"><strong>{}</strong><ol class="choices">{}</ol></span>"#,
                html_escape(question),
                items
            )
        }
    };

    format!(
        r#"<div class="{}">{}<div class="{}">{}</div></div>"#,
        row_class, avatar, text_class, content
    )
}

/// HTML for the whole transcript.
pub fn transcript_html(history: &History) -> String {
    render_blocks(history).iter().map(block_html).collect()
}
