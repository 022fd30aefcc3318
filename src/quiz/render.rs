use async_trait::async_trait;
use teloxide::utils::html;

use crate::quiz::Question;

pub const LOADING_TEXT: &str = "Loading quiz...";

const BLOCK_SEPARATOR: &str = "\n\n";
// Room kept for the "did not fit" line at the end of a cut quiz
const OVERFLOW_RESERVE: usize = 80;

/// Where the renderer draws. Markup is Telegram-flavoured HTML.
#[async_trait]
pub trait Surface: Send {
    /// Handle of a notice once it has been placed on the surface.
    type Notice: Clone + Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Longest markup the surface can show at once, measured in UTF-16 code units.
    fn max_markup_len(&self) -> Option<usize> {
        None
    }

    /// Replaces everything in the display area.
    async fn replace_container(&mut self, markup: &str) -> Result<(), Self::Error>;

    /// Places a new notice above everything else on the surface.
    async fn insert_notice(&mut self, markup: &str) -> Result<Self::Notice, Self::Error>;

    /// Rewrites an existing notice. `Ok(false)` when the notice is no longer on the surface.
    async fn update_notice(&mut self, notice: &Self::Notice, markup: &str) -> Result<bool, Self::Error>;
}

pub struct Renderer<S: Surface> {
    surface: S,
    notice: Option<S::Notice>,
}

impl<S: Surface> Renderer<S> {
    /// Resumes rendering on a surface that may already show a notice.
    pub fn with_notice(surface: S, notice: Option<S::Notice>) -> Self {
        Self { surface, notice }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn notice(&self) -> Option<&S::Notice> {
        self.notice.as_ref()
    }

    pub async fn render_loading(&mut self) -> Result<(), S::Error> {
        self.surface.replace_container(LOADING_TEXT).await
    }

    pub async fn render_quiz(&mut self, questions: &[Question]) -> Result<(), S::Error> {
        let markup = quiz_markup(questions, self.surface.max_markup_len());
        self.surface.replace_container(&markup).await
    }

    /// Shows `message` in the error notice, creating the notice if there is none yet
    /// or the old one has disappeared from the surface.
    pub async fn render_error(&mut self, message: &str) -> Result<(), S::Error> {
        let markup = notice_markup(message);
        if let Some(notice) = &self.notice {
            if self.surface.update_notice(notice, &markup).await? {
                return Ok(());
            }
        }
        let notice = self.surface.insert_notice(&markup).await?;
        self.notice = Some(notice);
        Ok(())
    }
}

#[cfg(test)]
impl<S: Surface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self::with_notice(surface, None)
    }

    pub fn into_parts(self) -> (S, Option<S::Notice>) {
        (self.surface, self.notice)
    }
}

/// One numbered block per question. With a `max_len`, blocks that do not fit are
/// left out and counted in a closing line instead.
pub fn quiz_markup(questions: &[Question], max_len: Option<usize>) -> String {
    let Some(max_len) = max_len else {
        return questions
            .iter()
            .enumerate()
            .map(|(i, question)| question_block(i + 1, html::escape(question.text())))
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);
    };

    let budget = max_len.saturating_sub(OVERFLOW_RESERVE);
    let mut markup = String::new();
    let mut shown = 0;
    for (i, question) in questions.iter().enumerate() {
        let block = question_block(i + 1, html::escape(question.text()));
        let separator = if markup.is_empty() { "" } else { BLOCK_SEPARATOR };
        if markup_len(&markup) + markup_len(separator) + markup_len(&block) > budget {
            if shown == 0 {
                // A single question longer than the whole message: show what fits of it
                let label_len = markup_len(&question_block(1, String::new()));
                let text = escape_within(question.text(), budget.saturating_sub(label_len + 1));
                markup = question_block(1, format!("{}…", text));
                shown = 1;
            }
            break;
        }
        markup.push_str(separator);
        markup.push_str(&block);
        shown += 1;
    }

    let hidden = questions.len() - shown;
    if hidden > 0 {
        markup.push_str(&format!(
            "{}<i>{} more question(s) did not fit in this message</i>",
            BLOCK_SEPARATOR, hidden
        ));
    }
    markup
}

pub fn notice_markup(message: &str) -> String {
    format!("🔴 <b>{}</b>", html::escape(message))
}

fn question_block(number: usize, escaped_text: String) -> String {
    format!("<b>Q{}:</b> {}", number, escaped_text)
}

fn markup_len(markup: &str) -> usize {
    markup.encode_utf16().count()
}

/// Escapes the longest prefix of `text` whose escaped form stays within `budget`.
fn escape_within(text: &str, budget: usize) -> String {
    let mut escaped = String::new();
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let piece = html::escape(c.encode_utf8(&mut buf));
        if markup_len(&escaped) + markup_len(&piece) > budget {
            break;
        }
        escaped.push_str(&piece);
    }
    escaped
}
