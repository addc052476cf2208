//! Async actor surface (additive; the synchronous [`crate::Quill`] works
//! without this module). A single `tokio` task owns the `Quill` instance and
//! drains commands off an `mpsc` channel, replying through a `oneshot` per
//! call, the same shape as the reference BM25 indexing actor this crate's
//! search pipeline descends from.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};

use quill_engine::{EngineConfig, SearchConfig, SearchOutcome};
use quill_query::{QueryExecutor, QueryResult, QueryRunner};
use quill_store::{NoteFields, NoteRow, StoreConfig};

use crate::Quill;

const COMMAND_CHANNEL_CAPACITY: usize = 128;

pub enum QuillCmd {
    CreateNote {
        id: String,
        fields: NoteFields,
        resp: oneshot::Sender<NoteRow>,
    },
    UpdateNote {
        id: String,
        fields: NoteFields,
        reason: String,
        resp: oneshot::Sender<quill_error::Result<NoteRow>>,
    },
    UpsertNote {
        id: String,
        fields: NoteFields,
        reason: String,
        resp: oneshot::Sender<NoteRow>,
    },
    DeleteNote {
        id: String,
        resp: oneshot::Sender<bool>,
    },
    Search {
        query: String,
        config: SearchConfig,
        limit: usize,
        resp: oneshot::Sender<SearchOutcome>,
    },
    RunRo {
        scope_id: String,
        script: String,
        params: HashMap<String, String>,
        resp: oneshot::Sender<QueryResult>,
    },
    RunWs {
        scope_id: String,
        script: String,
        params: HashMap<String, String>,
        resp: oneshot::Sender<QueryResult>,
    },
}

/// A cloneable handle to a `Quill` instance running on its own `tokio` task.
#[derive(Clone)]
pub struct QuillHandle {
    tx: mpsc::Sender<QuillCmd>,
}

impl QuillHandle {
    /// Spawns the actor task and returns a handle to it. The task exits once
    /// every `QuillHandle` clone has been dropped.
    pub fn spawn<E>(engine_config: EngineConfig, store_config: StoreConfig, runner: QueryRunner<E>) -> Self
    where
        E: QueryExecutor + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<QuillCmd>(COMMAND_CHANNEL_CAPACITY);
        let mut quill = Quill::new(engine_config, store_config, runner);
        tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                match cmd {
                    QuillCmd::CreateNote { id, fields, resp } => {
                        let _ = resp.send(quill.create_note(id, fields));
                    }
                    QuillCmd::UpdateNote { id, fields, reason, resp } => {
                        let _ = resp.send(quill.update_note(&id, fields, reason));
                    }
                    QuillCmd::UpsertNote { id, fields, reason, resp } => {
                        let _ = resp.send(quill.upsert_note(id, fields, reason));
                    }
                    QuillCmd::DeleteNote { id, resp } => {
                        let _ = resp.send(quill.delete_note(&id));
                    }
                    QuillCmd::Search { query, config, limit, resp } => {
                        let _ = resp.send(quill.search_notes(&query, &config, limit));
                    }
                    QuillCmd::RunRo { scope_id, script, params, resp } => {
                        let _ = resp.send(quill.run_ro(&scope_id, &script, &params));
                    }
                    QuillCmd::RunWs { scope_id, script, params, resp } => {
                        let _ = resp.send(quill.run_ws(&scope_id, &script, &params));
                    }
                }
            }
        });
        Self { tx }
    }

    pub async fn create_note(&self, id: impl Into<String>, fields: NoteFields) -> Result<NoteRow, ActorClosed> {
        let (resp, recv) = oneshot::channel();
        self.send(QuillCmd::CreateNote { id: id.into(), fields, resp }).await?;
        recv.await.map_err(|_| ActorClosed)
    }

    pub async fn update_note(
        &self,
        id: impl Into<String>,
        fields: NoteFields,
        reason: impl Into<String>,
    ) -> Result<quill_error::Result<NoteRow>, ActorClosed> {
        let (resp, recv) = oneshot::channel();
        self.send(QuillCmd::UpdateNote {
            id: id.into(),
            fields,
            reason: reason.into(),
            resp,
        })
        .await?;
        recv.await.map_err(|_| ActorClosed)
    }

    pub async fn upsert_note(
        &self,
        id: impl Into<String>,
        fields: NoteFields,
        reason: impl Into<String>,
    ) -> Result<NoteRow, ActorClosed> {
        let (resp, recv) = oneshot::channel();
        self.send(QuillCmd::UpsertNote {
            id: id.into(),
            fields,
            reason: reason.into(),
            resp,
        })
        .await?;
        recv.await.map_err(|_| ActorClosed)
    }

    pub async fn delete_note(&self, id: impl Into<String>) -> Result<bool, ActorClosed> {
        let (resp, recv) = oneshot::channel();
        self.send(QuillCmd::DeleteNote { id: id.into(), resp }).await?;
        recv.await.map_err(|_| ActorClosed)
    }

    pub async fn search(
        &self,
        query: impl Into<String>,
        config: SearchConfig,
        limit: usize,
    ) -> Result<SearchOutcome, ActorClosed> {
        let (resp, recv) = oneshot::channel();
        self.send(QuillCmd::Search {
            query: query.into(),
            config,
            limit,
            resp,
        })
        .await?;
        recv.await.map_err(|_| ActorClosed)
    }

    pub async fn run_ro(
        &self,
        scope_id: impl Into<String>,
        script: impl Into<String>,
        params: HashMap<String, String>,
    ) -> Result<QueryResult, ActorClosed> {
        let (resp, recv) = oneshot::channel();
        self.send(QuillCmd::RunRo {
            scope_id: scope_id.into(),
            script: script.into(),
            params,
            resp,
        })
        .await?;
        recv.await.map_err(|_| ActorClosed)
    }

    pub async fn run_ws(
        &self,
        scope_id: impl Into<String>,
        script: impl Into<String>,
        params: HashMap<String, String>,
    ) -> Result<QueryResult, ActorClosed> {
        let (resp, recv) = oneshot::channel();
        self.send(QuillCmd::RunWs {
            scope_id: scope_id.into(),
            script: script.into(),
            params,
            resp,
        })
        .await?;
        recv.await.map_err(|_| ActorClosed)
    }

    async fn send(&self, cmd: QuillCmd) -> Result<(), ActorClosed> {
        self.tx.send(cmd).await.map_err(|_| ActorClosed)
    }
}

/// The actor task has exited, so the command channel no longer has a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorClosed;

impl std::fmt::Display for ActorClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "quill actor task is no longer running")
    }
}

impl std::error::Error for ActorClosed {}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_query::{LaneValidator, RawRows, ResourceCaps};

    struct EchoExecutor;
    impl QueryExecutor for EchoExecutor {
        fn execute(&self, _script: &str, _params: &HashMap<String, String>) -> quill_error::Result<RawRows> {
            Ok(RawRows::default())
        }
    }

    fn runner() -> QueryRunner<EchoExecutor> {
        QueryRunner::new(
            EchoExecutor,
            LaneValidator::new(["workspace_artifacts".to_string()]),
            ResourceCaps::default(),
        )
    }

    fn note_fields(title: &str, content: &str) -> NoteFields {
        NoteFields {
            world_id: "w1".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            markdown_content: String::new(),
            folder_id: None,
            entity_kind: None,
            entity_subtype: None,
            is_entity: false,
            is_pinned: false,
            favorite: false,
            owner_id: None,
            narrative_id: None,
            order: 0,
        }
    }

    #[tokio::test]
    async fn create_then_search_round_trips_through_the_actor() {
        let handle = QuillHandle::spawn(EngineConfig::default(), StoreConfig::default(), runner());
        handle
            .create_note("n1", note_fields("First", "banana bread recipe"))
            .await
            .unwrap();
        let out = handle
            .search("banana", SearchConfig::default(), 10)
            .await
            .unwrap();
        assert_eq!(out.results.len(), 1);
    }

    #[tokio::test]
    async fn delete_then_search_no_longer_finds_the_note() {
        let handle = QuillHandle::spawn(EngineConfig::default(), StoreConfig::default(), runner());
        handle
            .create_note("n1", note_fields("First", "banana bread recipe"))
            .await
            .unwrap();
        handle.delete_note("n1").await.unwrap();
        let out = handle
            .search("banana", SearchConfig::default(), 10)
            .await
            .unwrap();
        assert!(out.results.is_empty());
    }

    #[tokio::test]
    async fn run_ro_through_the_handle_succeeds() {
        let handle = QuillHandle::spawn(EngineConfig::default(), StoreConfig::default(), runner());
        let result = handle
            .run_ro("scope-1", "?[x] := *notes {id}", HashMap::new())
            .await
            .unwrap();
        assert!(result.ok);
    }
}
