//! Postgres-backed stores.
//!
//! The job ledger's `claim` maps to `INSERT ... ON CONFLICT DO NOTHING`
//! against the unique identifier index: the database's atomicity is the one
//! and only concurrency gate in the dispatch layer.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::warn;
use uuid::Uuid;

use sabqcha_core::{LectureId, QuizId, RoomId, SolutionId, TaskSetId};
use sabqcha_jobs::{ClaimOutcome, JobId, JobIdentifier, JobLedger, LedgerError};
use sabqcha_lectures::{
    Lecture, LectureStore, Quiz, QuizSolution, QuizStore, StoreError, Task, TaskSetStore,
};

const SCHEMA: &str = r#"
create table if not exists job (
    job_id      uuid primary key,
    identifier  text not null unique,
    in_progress boolean not null
);

create table if not exists lecture (
    lecture_id uuid primary key,
    room_id    uuid not null,
    file_path  text not null,
    title      text not null,
    transcript text
);

create table if not exists task_set (
    task_set_id uuid primary key,
    lecture_id  uuid not null references lecture (lecture_id)
);

create table if not exists task (
    task_id     uuid primary key,
    task_set_id uuid not null references task_set (task_set_id),
    question    text not null,
    answer      text not null,
    options     text[] not null
);

create table if not exists quiz (
    quiz_id              uuid primary key,
    rubric_content       text not null,
    answer_sheet_content text not null
);

create table if not exists quiz_solution (
    solution_id   uuid primary key,
    quiz_id       uuid not null references quiz (quiz_id),
    solution_path text not null,
    score         text
);
"#;

/// Create the tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

fn storage_err(e: sqlx::Error) -> StoreError {
    StoreError::Storage(e.to_string())
}

/// Durable job ledger.
#[derive(Debug, Clone)]
pub struct PostgresJobLedger {
    pool: PgPool,
}

impl PostgresJobLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobLedger for PostgresJobLedger {
    async fn claim(&self, identifier: &JobIdentifier) -> Result<ClaimOutcome, LedgerError> {
        let job_id = JobId::new();
        let result = sqlx::query(
            r#"
            insert into job (job_id, identifier, in_progress)
            values ($1, $2, true)
            on conflict (identifier) do nothing
            "#,
        )
        .bind(job_id.0)
        .bind(identifier.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            Ok(ClaimOutcome::Conflict)
        } else {
            Ok(ClaimOutcome::Claimed(job_id))
        }
    }

    async fn release(&self, job_id: JobId) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            update job set
                in_progress = false
            where
                job_id = $1
            "#,
        )
        .bind(job_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            warn!(%job_id, "release for unknown job id");
        }
        Ok(())
    }

    async fn status_of(&self, identifier: &JobIdentifier) -> Result<bool, LedgerError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            select in_progress from job where identifier = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(e.to_string()))?
        .ok_or(LedgerError::NotFound)
    }
}

/// Durable lecture store.
#[derive(Debug, Clone)]
pub struct PostgresLectureStore {
    pool: PgPool,
}

impl PostgresLectureStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn lecture_from_row(row: &sqlx::postgres::PgRow) -> Lecture {
    Lecture {
        id: LectureId::from_uuid(row.get::<Uuid, _>("lecture_id")),
        room_id: RoomId::from_uuid(row.get::<Uuid, _>("room_id")),
        file_path: row.get("file_path"),
        title: row.get("title"),
        transcript: row.get("transcript"),
    }
}

#[async_trait]
impl LectureStore for PostgresLectureStore {
    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            insert into lecture (lecture_id, room_id, file_path, title, transcript)
            values ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(lecture.id.as_uuid())
        .bind(lecture.room_id.as_uuid())
        .bind(&lecture.file_path)
        .bind(&lecture.title)
        .bind(&lecture.transcript)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn get_lecture(&self, id: LectureId) -> Result<Option<Lecture>, StoreError> {
        let row = sqlx::query(
            r#"
            select lecture_id, room_id, file_path, title, transcript
            from lecture
            where lecture_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.as_ref().map(lecture_from_row))
    }

    async fn list_for_room(&self, room_id: RoomId) -> Result<Vec<Lecture>, StoreError> {
        let rows = sqlx::query(
            r#"
            select lecture_id, room_id, file_path, title, transcript
            from lecture
            where room_id = $1
            order by lecture_id
            "#,
        )
        .bind(room_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.iter().map(lecture_from_row).collect())
    }

    async fn add_transcription(&self, id: LectureId, transcript: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            update lecture set
                transcript = $1
            where
                lecture_id = $2
            "#,
        )
        .bind(transcript)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Durable task-set store.
#[derive(Debug, Clone)]
pub struct PostgresTaskSetStore {
    pool: PgPool,
}

impl PostgresTaskSetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskSetStore for PostgresTaskSetStore {
    async fn insert_task_set(
        &self,
        lecture_id: LectureId,
        tasks: &[Task],
    ) -> Result<TaskSetId, StoreError> {
        let task_set_id = TaskSetId::new();
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        sqlx::query(
            r#"
            insert into task_set (task_set_id, lecture_id)
            values ($1, $2)
            "#,
        )
        .bind(task_set_id.as_uuid())
        .bind(lecture_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        for task in tasks {
            sqlx::query(
                r#"
                insert into task (task_id, task_set_id, question, answer, options)
                values ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(task_set_id.as_uuid())
            .bind(&task.question)
            .bind(&task.answer)
            .bind(&task.options)
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        }

        tx.commit().await.map_err(storage_err)?;
        Ok(task_set_id)
    }
}

/// Durable quiz store.
#[derive(Debug, Clone)]
pub struct PostgresQuizStore {
    pool: PgPool,
}

impl PostgresQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PostgresQuizStore {
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StoreError> {
        let row = sqlx::query(
            r#"
            select quiz_id, rubric_content, answer_sheet_content
            from quiz
            where quiz_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(|row| Quiz {
            id: QuizId::from_uuid(row.get::<Uuid, _>("quiz_id")),
            rubric_content: row.get("rubric_content"),
            answer_sheet_content: row.get("answer_sheet_content"),
        }))
    }

    async fn get_solution(&self, id: SolutionId) -> Result<Option<QuizSolution>, StoreError> {
        let row = sqlx::query(
            r#"
            select solution_id, quiz_id, solution_path, score
            from quiz_solution
            where solution_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(|row| QuizSolution {
            id: SolutionId::from_uuid(row.get::<Uuid, _>("solution_id")),
            quiz_id: QuizId::from_uuid(row.get::<Uuid, _>("quiz_id")),
            solution_path: row.get("solution_path"),
            score: row.get("score"),
        }))
    }

    async fn set_solution_score(&self, id: SolutionId, score: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            update quiz_solution set
                score = $1
            where
                solution_id = $2
            "#,
        )
        .bind(score)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
