use log::{info, warn};

use crate::quiz::{
    client::QuizClient,
    form::{read_quiz_request, FormSource},
    render::{Renderer, Surface},
    QuizError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The form did not pass validation, nothing was sent.
    Rejected,
    /// The request was sent but no quiz could be shown.
    Failed,
    Rendered(usize),
}

/// Runs one generate action: validate the form, fetch the quiz, render whatever came out of it.
///
/// Quiz failures, including a surface refusing the quiz, end up in the error notice.
/// Only a surface that cannot show the notice either is returned as an error.
pub async fn generate_quiz<F, S>(
    form: &F,
    client: &QuizClient,
    renderer: &mut Renderer<S>,
) -> Result<Outcome, S::Error>
where
    F: FormSource + ?Sized,
    S: Surface,
{
    let request = match read_quiz_request(form) {
        Ok(request) => request,
        Err(err) => {
            info!("Form rejected: {}", err);
            renderer.render_error(&err.user_message()).await?;
            return Ok(Outcome::Rejected);
        }
    };

    renderer.render_loading().await?;

    match client.generate(&request).await {
        Ok(questions) => {
            info!(
                "Generated {} questions about {}",
                questions.len(),
                request.topics.join(", ")
            );
            if let Err(err) = renderer.render_quiz(&questions).await {
                warn!("Could not show the generated quiz: {}", err);
                let err = QuizError::Render(err.to_string());
                renderer.render_error(&err.user_message()).await?;
                return Ok(Outcome::Failed);
            }
            Ok(Outcome::Rendered(questions.len()))
        }
        Err(err) => {
            warn!("Quiz generation failed: {}", err);
            renderer.render_error(&err.user_message()).await?;
            Ok(Outcome::Failed)
        }
    }
}
