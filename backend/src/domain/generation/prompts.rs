//! Prompt construction for question and feedback generation.

use crate::domain::ports::{GenerationPrompt, PromptTurn};
use crate::domain::{JobInfo, Question, QuestionDifficulty};

fn job_context(job_info: &JobInfo) -> String {
    let mut context = format!(
        "Job description: {}\nExperience level: {}",
        job_info.description(),
        job_info.experience_level()
    );
    if let Some(title) = job_info.title() {
        context.push_str("\nJob title: ");
        context.push_str(title);
    }
    context
}

/// Prompt for the next question of a job context.
///
/// Earlier finalized questions are replayed in chronological order, each as
/// the answer to the difficulty that requested it, so the model avoids
/// repeating itself. Unfinished placeholders are skipped.
pub fn question_prompt(
    job_info: &JobInfo,
    previous: &[Question],
    difficulty: QuestionDifficulty,
) -> GenerationPrompt {
    let system = format!(
        "You are an interviewer preparing a candidate for a job interview.\n\
         {}\n\n\
         Write exactly one technical interview question suited to the role and \
         the requested difficulty. Prefer practical, real-world scenarios over \
         trivia. Do not repeat an earlier question. Return only the question, \
         formatted as markdown, with no answer or commentary.",
        job_context(job_info)
    );

    let mut turns = Vec::with_capacity(previous.len() * 2 + 1);
    for question in previous.iter().filter(|question| !question.is_placeholder()) {
        turns.push(PromptTurn::user(question.difficulty.as_str()));
        turns.push(PromptTurn::model(question.text.clone()));
    }
    turns.push(PromptTurn::user(difficulty.as_str()));

    GenerationPrompt { system, turns }
}

/// Prompt grading a candidate's answer to `question`.
pub fn feedback_prompt(job_info: &JobInfo, question: &Question, answer: &str) -> GenerationPrompt {
    let system = format!(
        "You are an interviewer reviewing a candidate's answer.\n\
         {}\n\n\
         The question was asked at {} difficulty. Rate the answer from 1 to 10, \
         then explain what was strong, what was missing, and how to improve. \
         Finish with a concise model answer. Address the candidate directly and \
         format the response as markdown.",
        job_context(job_info),
        question.difficulty
    );
    let turns = vec![PromptTurn::user(format!(
        "Question:\n{}\n\nAnswer:\n{}",
        question.text, answer
    ))];

    GenerationPrompt { system, turns }
}
