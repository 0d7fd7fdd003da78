//! Persistence worker thread.
//!
//! The note store lives on a dedicated thread. The host sends requests
//! through one channel and polls outcomes from another, so saving never
//! blocks key handling. Requests are answered in the order they were sent.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::note::{Note, NoteDraft, NoteId, NoteQuery};
use super::store::NoteStore;
use crate::error::{Error, Result};

/// Monotonic id tying a response to its request.
pub type RequestId = u64;

enum Request {
    Save {
        request: RequestId,
        target: Option<NoteId>,
        draft: NoteDraft,
    },
    Fetch {
        request: RequestId,
        query: NoteQuery,
    },
    Shutdown,
}

/// Outcome of a request, delivered back to the host.
#[derive(Debug)]
pub enum Response {
    Saved {
        request: RequestId,
        result: Result<Note>,
    },
    Fetched {
        request: RequestId,
        result: Result<Vec<Note>>,
    },
}

impl Response {
    pub fn request(&self) -> RequestId {
        match self {
            Self::Saved { request, .. } | Self::Fetched { request, .. } => *request,
        }
    }
}

pub struct PersistenceWorker {
    requests: Sender<Request>,
    responses: Receiver<Response>,
    handle: Option<JoinHandle<()>>,
    next_request: RequestId,
}

impl PersistenceWorker {
    /// Spawn the worker thread, moving `store` onto it.
    pub fn spawn(store: Box<dyn NoteStore>) -> io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("notabili-store".to_string())
            .spawn(move || run_worker(store, request_rx, response_tx))?;

        Ok(Self {
            requests: request_tx,
            responses: response_rx,
            handle: Some(handle),
            next_request: 1,
        })
    }

    /// Create (`target == None`) or update a note.
    pub fn save(&mut self, target: Option<NoteId>, draft: NoteDraft) -> Result<RequestId> {
        let request = self.next_id();
        self.send(Request::Save {
            request,
            target,
            draft,
        })?;
        Ok(request)
    }

    pub fn fetch(&mut self, query: NoteQuery) -> Result<RequestId> {
        let request = self.next_id();
        self.send(Request::Fetch { request, query })?;
        Ok(request)
    }

    /// Next finished response, if any.
    pub fn try_recv(&self) -> Option<Response> {
        self.responses.try_recv().ok()
    }

    /// Wait up to `timeout` for the next response.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it to drain.
    pub fn stop(&mut self) {
        let _ = self.requests.send(Request::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("persistence worker panicked");
            }
        }
    }

    fn next_id(&mut self) -> RequestId {
        let id = self.next_request;
        self.next_request += 1;
        id
    }

    fn send(&self, request: Request) -> Result<()> {
        self.requests.send(request).map_err(|_| Error::WorkerGone)
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(mut store: Box<dyn NoteStore>, requests: Receiver<Request>, responses: Sender<Response>) {
    tracing::debug!("persistence worker started");
    while let Ok(request) = requests.recv() {
        let response = match request {
            Request::Save {
                request,
                target,
                draft,
            } => {
                let result = match target {
                    Some(id) => store.update(id, draft),
                    None => store.create(draft),
                };
                if let Err(err) = &result {
                    tracing::warn!(request, error = %err, "save failed");
                }
                Response::Saved { request, result }
            }
            Request::Fetch { request, query } => {
                let result = store.find(&query);
                if let Err(err) = &result {
                    tracing::warn!(request, error = %err, "fetch failed");
                }
                Response::Fetched { request, result }
            }
            Request::Shutdown => break,
        };
        if responses.send(response).is_err() {
            break;
        }
    }
    tracing::debug!("persistence worker stopped");
}
