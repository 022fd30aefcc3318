mod chat;
mod config;
mod quiz;

use std::sync::Arc;

use chat::{ChatSurface, Display};
use config::Config;
use dotenv::dotenv;
use log::{debug, error, info};
use quiz::{
    client::QuizClient,
    flow::{generate_quiz, Outcome},
    form::{FormField, QuizForm},
};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    FillingForm {
        form: QuizForm,
        field: FormField,
        display: Display,
    },
    ReadyToGenerate {
        form: QuizForm,
        display: Display,
    },
}

type QuizStorage = Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    // A .env file is optional, plain environment variables work just as well
    dotenv().ok();

    pretty_env_logger::init();
    info!("Starting quiz generator bot...");

    let config = Config::from_env();
    let bot = Bot::from_env();

    info!("Opening dialogue storage at {}", config.dialogue_db);
    let storage: QuizStorage = match SqliteStorage::open(&config.dialogue_db, Json).await {
        Ok(storage) => storage.erase(),
        Err(err) => {
            error!("Failed to open dialogue storage {}: {}", config.dialogue_db, err);
            return;
        }
    };

    let client = Arc::new(QuizClient::with_endpoint(config.api_url));
    info!("Quiz API: {}", client.endpoint());

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(
                dptree::case![State::FillingForm {
                    form,
                    field,
                    display
                }]
                .endpoint(receive_field),
            )
            .branch(
                dptree::case![State::ReadyToGenerate { form, display }].endpoint(ready_to_generate),
            ),
    )
    .dependencies(dptree::deps![storage, client])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Hi! I put together quizzes on any topic you like. Let's fill in the quiz form.";
const GENERATE_BUTTON: &str = "Generate quiz";
const START_OVER_BUTTON: &str = "Start over";

const NO_CHOICES: &[&str] = &[];
const QUESTION_TYPES: &[&str] = &["multiple choice", "true/false", "short answer"];
const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];
const QUESTION_AMOUNTS: &[&str] = &["5", "10", "15", "20"];

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    ask_for(&bot, msg.chat.id, FormField::Topics).await?;
    dialogue
        .update(State::FillingForm {
            form: QuizForm::default(),
            field: FormField::Topics,
            display: Display::default(),
        })
        .await?;
    Ok(())
}

async fn ask_for(bot: &Bot, chat_id: ChatId, field: FormField) -> HandlerResult {
    let (prompt, choices) = match field {
        FormField::Topics => (
            "Which topics should the quiz cover? Separate them with commas.",
            NO_CHOICES,
        ),
        FormField::QuestionType => ("What type of questions do you want?", QUESTION_TYPES),
        FormField::Difficulty => ("How hard should they be?", DIFFICULTIES),
        FormField::NumQuestions => ("How many questions? (1-20)", QUESTION_AMOUNTS),
    };

    let request = bot.send_message(chat_id, prompt);
    if choices.is_empty() {
        request.reply_markup(KeyboardRemove::new()).await?;
    } else {
        let keyboard = KeyboardMarkup::new(
            choices
                .iter()
                .map(|choice| vec![KeyboardButton::new(*choice)])
                .collect::<Vec<_>>(),
        );
        request.reply_markup(keyboard).await?;
    }
    Ok(())
}

async fn receive_field(
    bot: Bot,
    dialogue: QuizDialogue,
    (mut form, field, display): (QuizForm, FormField, Display),
    msg: Message,
) -> HandlerResult {
    let Some(value) = msg.text() else {
        bot.send_message(msg.chat.id, "Please answer with text").await?;
        return Ok(());
    };
    debug!("Chat {} filled {}: {:?}", msg.chat.id, field.id(), value);
    form.set(field, value);

    if let Some(next) = field.next() {
        ask_for(&bot, msg.chat.id, next).await?;
        dialogue
            .update(State::FillingForm {
                form,
                field: next,
                display,
            })
            .await?;
        return Ok(());
    }

    let keyboard = KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(GENERATE_BUTTON)],
        vec![KeyboardButton::new(START_OVER_BUTTON)],
    ]);
    bot.send_message(msg.chat.id, "All set! Press \"Generate quiz\" when you are ready.")
        .reply_markup(keyboard)
        .await?;
    dialogue
        .update(State::ReadyToGenerate { form, display })
        .await?;
    Ok(())
}

async fn ready_to_generate(
    bot: Bot,
    dialogue: QuizDialogue,
    client: Arc<QuizClient>,
    (form, display): (QuizForm, Display),
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(GENERATE_BUTTON) => {
            info!("Chat {} asked for a quiz", msg.chat.id);
            let mut renderer = ChatSurface::renderer(bot.clone(), msg.chat.id, display);
            let generated = generate_quiz(&form, &client, &mut renderer).await;
            let display = ChatSurface::display(&renderer);

            // Messages sent before Telegram failed are still in the chat, keep pointing at them
            let outcome = match generated {
                Ok(outcome) => outcome,
                Err(err) => {
                    dialogue
                        .update(State::ReadyToGenerate { form, display })
                        .await?;
                    return Err(err.into());
                }
            };

            // A rejected form has to be filled in again, anything else can simply be retried
            if outcome == Outcome::Rejected {
                bot.send_message(msg.chat.id, "Let's fix the form.").await?;
                ask_for(&bot, msg.chat.id, FormField::Topics).await?;
                dialogue
                    .update(State::FillingForm {
                        form: QuizForm::default(),
                        field: FormField::Topics,
                        display,
                    })
                    .await?;
            } else {
                dialogue
                    .update(State::ReadyToGenerate { form, display })
                    .await?;
            }
        }
        Some(START_OVER_BUTTON) => {
            ask_for(&bot, msg.chat.id, FormField::Topics).await?;
            dialogue
                .update(State::FillingForm {
                    form: QuizForm::default(),
                    field: FormField::Topics,
                    display,
                })
                .await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Please choose one of the options")
                .await?;
        }
    }
    Ok(())
}
