//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Record, Shape};
use crate::render::Diagram;
use crate::session::Verdict;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Levels,
    Records,
    Session,
    StartLevel {
        #[serde(rename = "levelIndex")]
        level_index: usize,
    },
    SubmitAnswer {
        answer: String,
    },
    Next,
    Menu,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Levels { levels: Vec<LevelOut> },
    Records { records: Vec<Record> },
    Session { session: SessionView },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Menu,
    InProgress,
    LevelComplete,
}

/// Everything a client needs to draw the current screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: PhaseName,
    pub level_index: Option<usize>,
    pub level_name: Option<String>,
    pub score: u32,
    pub tasks_completed: u32,
    pub batch_size: u32,
    /// "tasksCompleted/batchSize", as shown next to the target icon.
    pub progress: String,
    pub task: Option<TaskOut>,
    pub verdict: Option<VerdictOut>,
    pub summary: Option<SummaryOut>,
}

/// A task as shown to the learner. The perimeter itself is only revealed
/// through `VerdictOut` once an answer has been judged.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOut {
    pub number: u32,
    pub shape: Shape,
    pub shape_name: String,
    pub sides: Vec<f64>,
    pub prompt: String,
    pub diagram: Diagram,
    pub svg: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictOut {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOut {
    pub title: String,
    pub message: String,
    pub record: Option<Record>,
}

#[derive(Debug, Serialize)]
pub struct ShapeOut {
    pub shape: Shape,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LevelOut {
    pub index: usize,
    pub id: u32,
    pub name: String,
    pub description: String,
    pub shapes: Vec<ShapeOut>,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartIn {
    #[serde(rename = "levelIndex")]
    pub level_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedOut {
    pub id: String,
    pub session: SessionView,
}

#[derive(Serialize)]
pub struct LevelsOut {
    pub levels: Vec<LevelOut>,
}

#[derive(Serialize)]
pub struct RecordsOut {
    pub records: Vec<Record>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
