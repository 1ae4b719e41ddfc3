use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use gullak_core::errors::{Error, Result};
use log::error;
use std::any::Any;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

// A queued write job. It runs on the actor's dedicated connection and its
// return value is type-erased so jobs with different result types can share
// one channel.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction, so SQLite takes the
    /// write lock up front instead of failing halfway through.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        let erased: ErasedJob = Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>));
        if self.tx.send((erased, ret_tx)).await.is_err() {
            return Err(Error::Unexpected(
                "Write actor is no longer running".to_string(),
            ));
        }

        let result = ret_rx.await.map_err(|_| {
            Error::Unexpected("Write actor dropped the reply channel".to_string())
        })?;

        result.and_then(|boxed| {
            boxed.downcast::<T>().map(|v| *v).map_err(|_| {
                Error::Unexpected("Write actor returned an unexpected result type".to_string())
            })
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the
/// database.
///
/// The actor holds one connection from the pool for its whole lifetime and
/// processes write jobs serially, each inside its own immediate transaction.
pub fn spawn_writer(pool: Arc<DbPool>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping rx makes every pending and future exec fail with
                // a channel error instead of hanging.
                error!("Write actor could not acquire a database connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // Ignore error if the receiver has dropped (e.g. the request
            // was cancelled).
            let _ = reply_tx.send(result);
        }
        // rx.recv() returned None: every WriteHandle is gone, shut down.
    });

    WriteHandle { tx }
}
