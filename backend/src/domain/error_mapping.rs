//! Translation of port errors into domain errors.
//!
//! Connection failures surface as `service_unavailable`; query failures as
//! `internal_error` (redacted by the HTTP adapter).

use super::Error;
use super::ports::{
    FeedbackRepositoryError, InterviewRepositoryError, JobInfoRepositoryError,
    QuestionRepositoryError, UserRepositoryError,
};

macro_rules! map_repository_error {
    ($fn_name:ident, $error:ident, $label:literal) => {
        pub(crate) fn $fn_name(error: $error) -> Error {
            match error {
                $error::Connection { message } => {
                    Error::service_unavailable(format!("{} unavailable: {message}", $label))
                }
                $error::Query { message } => {
                    Error::internal(format!("{} error: {message}", $label))
                }
            }
        }
    };
}

map_repository_error!(map_job_info_error, JobInfoRepositoryError, "job info repository");
map_repository_error!(map_question_error, QuestionRepositoryError, "question repository");
map_repository_error!(map_feedback_error, FeedbackRepositoryError, "feedback repository");
map_repository_error!(map_interview_error, InterviewRepositoryError, "interview repository");
map_repository_error!(map_user_error, UserRepositoryError, "user repository");
