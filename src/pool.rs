//! Pool: cross-frame reuse of typed views.
//!
//! A renderer acquires a view at the start of a frame and hands it to the
//! next stage (often on another thread). That stage returns it through a
//! [`Recycler`] once it is done reading, and the next frame's acquire picks
//! it up with its capacity intact, so steady-state frames allocate nothing.
//!
//! ```text
//! ┌──────────┐  acquire   ┌──────────┐   move    ┌──────────────┐
//! │ DataPool │ ─────────▶ │ Renderer │ ────────▶ │ GPU submitter│
//! └──────────┘            └──────────┘           └──────────────┘
//!       ▲                    Recycler::recycle          │
//!       └───────────────────────────────────────────────┘
//! ```

use crate::config::DataConfig;
use crate::view::{Record, TypedData};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, trace};

/// Idle views waiting to be reused.
pub struct DataPool<R: Record> {
    /// Return path for recycled views.
    tx: Sender<TypedData<R>>,
    /// Idle views.
    rx: Receiver<TypedData<R>>,
    /// Configuration for newly allocated views.
    config: DataConfig,
}

/// Cloneable handle for returning views to a [`DataPool`] from any thread.
pub struct Recycler<R: Record> {
    tx: Sender<TypedData<R>>,
}

impl<R: Record> Clone for Recycler<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<R: Record> DataPool<R> {
    /// Create a pool holding at most `max_idle` idle views.
    pub fn new(max_idle: usize) -> Self {
        Self::with_config(max_idle, DataConfig::default())
    }

    /// Create a pool whose fresh views use `config`.
    pub fn with_config(max_idle: usize, config: DataConfig) -> Self {
        let (tx, rx) = bounded(max_idle);
        Self { tx, rx, config }
    }

    /// Take a view sized for `records` records.
    ///
    /// Reuses an idle view when one exists (growing it only if it is too
    /// small), otherwise allocates. The returned view has `count() == 0`;
    /// its contents are stale or uninitialised either way.
    pub fn acquire(&self, records: usize) -> TypedData<R> {
        if let Ok(mut data) = self.rx.try_recv() {
            trace!(record = R::LABEL, records, "reusing pooled frame data");
            data.set_len_records(records);
            data.set_count(0);
            return data;
        }
        debug!(record = R::LABEL, records, "frame data pool miss");
        TypedData::with_config(records, self.config)
    }

    /// Return a view to the pool.
    pub fn recycle(&self, data: TypedData<R>) {
        recycle_into(&self.tx, data);
    }

    /// A handle other stages can use to return views.
    pub fn recycler(&self) -> Recycler<R> {
        Recycler {
            tx: self.tx.clone(),
        }
    }

    /// Number of idle views.
    #[inline]
    pub fn idle(&self) -> usize {
        self.rx.len()
    }
}

impl<R: Record> Recycler<R> {
    /// Return a view to its pool. Dropped if the pool is full or gone.
    pub fn recycle(&self, data: TypedData<R>) {
        recycle_into(&self.tx, data);
    }
}

fn recycle_into<R: Record>(tx: &Sender<TypedData<R>>, data: TypedData<R>) {
    // Corrupted views never re-enter the pool.
    if cfg!(debug_assertions) {
        data.check_for_overrun();
    }
    match tx.try_send(data) {
        Ok(()) => {}
        Err(TrySendError::Full(data)) => {
            trace!(record = R::LABEL, capacity = data.capacity(), "pool full, dropping frame data");
        }
        Err(TrySendError::Disconnected(_)) => {}
    }
}

impl<R: Record> std::fmt::Debug for DataPool<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataPool")
            .field("record", &R::LABEL)
            .field("idle", &self.idle())
            .field("max_idle", &self.tx.capacity())
            .finish()
    }
}
