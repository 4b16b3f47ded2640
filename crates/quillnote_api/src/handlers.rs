//! Note request handlers.
//!
//! Each handler resolves the caller, runs one service operation and wraps
//! the outcome in an `ApiResponse`. Handlers never return `Err`.

use crate::envelope::{status_code_for, ApiResponse};
use crate::requests::{CreateNoteRequest, ReadAllNoteQuery, UpdateNoteRequest};
use log::{debug, error};
use quillnote_core::{
    CallerContext, Clock, ErrorKind, ListNotesQuery, NoteId, NoteService, NoteServiceError,
    NoteStore, SystemClock, UserId,
};
use serde::Serialize;

const NOT_FOUND_MESSAGE: &str = "notes not found";
const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    ReadOne,
    ReadAll,
    Update(NoteId),
    Delete(NoteId),
}

impl Operation {
    fn event(self) -> &'static str {
        match self {
            Self::Create => "api_note_create",
            Self::ReadOne => "api_note_read_one",
            Self::ReadAll => "api_note_read_all",
            Self::Update(_) => "api_note_update",
            Self::Delete(_) => "api_note_delete",
        }
    }

    fn success_message(self) -> String {
        match self {
            Self::Create => "success created note".to_string(),
            Self::ReadOne => "success read one note".to_string(),
            Self::ReadAll => "Success read notes".to_string(),
            Self::Update(note_id) => format!("success update note with id {note_id}"),
            Self::Delete(note_id) => format!("success delete note with id {note_id}"),
        }
    }

    fn internal_message(self) -> &'static str {
        match self {
            Self::Create => "failed to create a new note",
            Self::ReadOne => "failed to read one note",
            Self::ReadAll => "Failed to read notes",
            Self::Update(_) => "failed to update note",
            Self::Delete(_) => "failed to delete note",
        }
    }
}

/// Note endpoints over a `NoteService` and a caller resolver `A`.
pub struct NotesApi<S: NoteStore, A, C: Clock = SystemClock> {
    service: NoteService<S, C>,
    caller: A,
}

impl<S: NoteStore, A, C: Clock> NotesApi<S, A, C> {
    pub fn new(service: NoteService<S, C>, caller: A) -> Self {
        Self { service, caller }
    }

    /// `POST /notes`
    pub fn create<Req: ?Sized>(&self, request: &Req, body: CreateNoteRequest) -> ApiResponse
    where
        A: CallerContext<Req>,
    {
        let outcome = self
            .resolve(request)
            .and_then(|caller_id| self.service.create_note(caller_id, body.into()));
        respond(Operation::Create, outcome)
    }

    /// `GET /notes/{id}`
    pub fn read_one<Req: ?Sized>(&self, request: &Req, note_id: NoteId) -> ApiResponse
    where
        A: CallerContext<Req>,
    {
        let outcome = self
            .resolve(request)
            .and_then(|caller_id| self.service.get_note(caller_id, note_id));
        respond(Operation::ReadOne, outcome)
    }

    /// `GET /notes`
    pub fn read_all<Req: ?Sized>(&self, request: &Req, query: ReadAllNoteQuery) -> ApiResponse
    where
        A: CallerContext<Req>,
    {
        let query = ListNotesQuery::from(query);
        let outcome = self
            .resolve(request)
            .and_then(|caller_id| self.service.list_notes(caller_id, &query));
        respond(Operation::ReadAll, outcome)
    }

    /// `PUT /notes/{id}`
    pub fn update<Req: ?Sized>(
        &self,
        request: &Req,
        note_id: NoteId,
        body: UpdateNoteRequest,
    ) -> ApiResponse
    where
        A: CallerContext<Req>,
    {
        let outcome = self
            .resolve(request)
            .and_then(|caller_id| self.service.update_note(caller_id, note_id, body.into()));
        respond(Operation::Update(note_id), outcome)
    }

    /// `DELETE /notes/{id}`
    pub fn delete<Req: ?Sized>(&self, request: &Req, note_id: NoteId) -> ApiResponse
    where
        A: CallerContext<Req>,
    {
        let outcome = self
            .resolve(request)
            .and_then(|caller_id| self.service.delete_note(caller_id, note_id));
        respond(Operation::Delete(note_id), outcome)
    }

    fn resolve<Req: ?Sized>(&self, request: &Req) -> Result<UserId, NoteServiceError>
    where
        A: CallerContext<Req>,
    {
        Ok(self.caller.resolve_caller_identity(request)?)
    }
}

fn respond<T: Serialize>(op: Operation, outcome: Result<T, NoteServiceError>) -> ApiResponse {
    let event = op.event();
    let response = match outcome {
        Ok(data) => match serde_json::to_value(&data) {
            Ok(data) => ApiResponse::success(op.success_message(), data),
            Err(err) => {
                error!("event={event} module=api status=error error_kind=encode error={err}");
                ApiResponse::failure(500, op.internal_message())
            }
        },
        Err(err) => failure_response(op, &err),
    };
    debug!(
        "event={event} module=api status_code={}",
        response.status_code
    );
    response
}

fn failure_response(op: Operation, err: &NoteServiceError) -> ApiResponse {
    let kind = err.kind();
    let message = match kind {
        ErrorKind::NotFound => NOT_FOUND_MESSAGE.to_string(),
        ErrorKind::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
        ErrorKind::Conflict | ErrorKind::Validation => err.to_string(),
        ErrorKind::Internal => {
            error!(
                "event={} module=api status=error error_kind=internal error={err:?}",
                op.event()
            );
            op.internal_message().to_string()
        }
    };
    ApiResponse::failure(status_code_for(kind), message)
}
