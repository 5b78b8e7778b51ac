use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use itinero_core::errors::{DatabaseError, Error, Result};
use log::error;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

/// Capacity of the job queue in front of the writer.
const WRITE_QUEUE_CAPACITY: usize = 256;

type BoxedAny = Box<dyn Any + Send + 'static>;

// A write job runs against the writer's connection inside one transaction.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type Envelope = (Job<BoxedAny>, oneshot::Sender<Result<BoxedAny>>);

fn writer_unavailable() -> Error {
    Error::Database(DatabaseError::Internal(
        "database writer is not running".to_string(),
    ))
}

/// Handle for sending jobs to the writer actor.
///
/// All writes go through one connection so SQLite never sees competing
/// writers; each job runs in an immediate transaction and is rolled back if
/// it returns an error.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        let erased: Job<BoxedAny> = Box::new(move |c| job(c).map(|v| Box::new(v) as BoxedAny));
        self.tx
            .send((erased, ret_tx))
            .await
            .map_err(|_| writer_unavailable())?;

        let boxed = ret_rx.await.map_err(|_| writer_unavailable())??;
        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Unexpected("database writer returned an unexpected result type".to_string())
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the
/// database. The actor owns one pooled connection for its whole lifetime and
/// stops when every `WriteHandle` has been dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(WRITE_QUEUE_CAPACITY);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping `rx` makes every pending and future exec fail
                error!("Database writer could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<BoxedAny> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The caller may have gone away; nothing to do then
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
