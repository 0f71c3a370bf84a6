//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Enumerations
//! (experience level, difficulty) are stored as text and parsed on read.

diesel::table! {
    /// Users mirrored from the identity provider. `id` is the provider's id.
    users (id) {
        id -> Varchar,
        email -> Varchar,
        name -> Varchar,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Target roles a user rehearses for.
    job_infos (id) {
        id -> Uuid,
        user_id -> Varchar,
        name -> Varchar,
        title -> Nullable<Varchar>,
        description -> Text,
        experience_level -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Generated questions. `text` is empty while the question is a placeholder.
    questions (id) {
        id -> Uuid,
        job_info_id -> Uuid,
        text -> Text,
        difficulty -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Generated feedback on an answer. `text` is empty while pending.
    question_feedback (id) {
        id -> Uuid,
        question_id -> Uuid,
        answer -> Text,
        text -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rehearsal interviews; completed once `external_session_id` is set.
    interviews (id) {
        id -> Uuid,
        job_info_id -> Uuid,
        duration -> Varchar,
        external_session_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(job_infos -> users (user_id));
diesel::joinable!(questions -> job_infos (job_info_id));
diesel::joinable!(question_feedback -> questions (question_id));
diesel::joinable!(interviews -> job_infos (job_info_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    job_infos,
    questions,
    question_feedback,
    interviews,
);
