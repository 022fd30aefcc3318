use crate::quiz::{QuizError, QuizRequest, MAX_QUESTIONS};

pub const REQUIRED_MESSAGE: &str = "All fields are required!";
pub const RANGE_MESSAGE: &str = "Please choose between 1 and 20 questions!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FormField {
    Topics,
    QuestionType,
    Difficulty,
    NumQuestions,
}

impl FormField {
    /// Identifier of the field in the form.
    pub fn id(&self) -> &'static str {
        match self {
            FormField::Topics => "topics",
            FormField::QuestionType => "q_type",
            FormField::Difficulty => "difficulty",
            FormField::NumQuestions => "num_questions",
        }
    }

    /// The field filled in after this one, `None` for the last one.
    pub fn next(&self) -> Option<FormField> {
        match self {
            FormField::Topics => Some(FormField::QuestionType),
            FormField::QuestionType => Some(FormField::Difficulty),
            FormField::Difficulty => Some(FormField::NumQuestions),
            FormField::NumQuestions => None,
        }
    }
}

/// Read access to the current values of the form, by field.
pub trait FormSource {
    fn field(&self, field: FormField) -> Option<&str>;
}

/// Raw, unvalidated form values as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizForm {
    pub topics: Option<String>,
    pub q_type: Option<String>,
    pub difficulty: Option<String>,
    pub num_questions: Option<String>,
}

impl QuizForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Topics => &mut self.topics,
            FormField::QuestionType => &mut self.q_type,
            FormField::Difficulty => &mut self.difficulty,
            FormField::NumQuestions => &mut self.num_questions,
        };
        *slot = Some(value.into());
    }
}

impl FormSource for QuizForm {
    fn field(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Topics => self.topics.as_deref(),
            FormField::QuestionType => self.q_type.as_deref(),
            FormField::Difficulty => self.difficulty.as_deref(),
            FormField::NumQuestions => self.num_questions.as_deref(),
        }
    }
}

/// Reads the form and checks it before anything is sent.
pub fn read_quiz_request<F: FormSource + ?Sized>(form: &F) -> Result<QuizRequest, QuizError> {
    let required = |field: FormField| {
        form.field(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| QuizError::Validation(REQUIRED_MESSAGE.to_string()))
    };

    let topics = form
        .field(FormField::Topics)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    if topics.is_empty() {
        return Err(QuizError::Validation(REQUIRED_MESSAGE.to_string()));
    }

    let kind = required(FormField::QuestionType)?;
    let difficulty = required(FormField::Difficulty)?;
    let num_questions = required(FormField::NumQuestions)?;

    let num_questions = match num_questions.parse::<i64>() {
        Ok(n) if (1..=i64::from(MAX_QUESTIONS)).contains(&n) => n as u8,
        _ => return Err(QuizError::Validation(RANGE_MESSAGE.to_string())),
    };

    Ok(QuizRequest {
        topics,
        kind: kind.to_string(),
        difficulty: difficulty.to_string(),
        num_questions,
    })
}
