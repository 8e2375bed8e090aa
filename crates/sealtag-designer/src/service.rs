//! # Geometry Service
//!
//! Serializes geometry work against one kernel instance.
//!
//! The kernel lives on a dedicated worker thread, created there by a factory
//! so it never has to be `Send`. Callers submit jobs through a channel with
//! room for one pending job and await the reply. Jobs run one at a time, in
//! arrival order, and always run to completion: a caller that stops waiting
//! only discards its result.
//!
//! The worker keeps the solid from the last successful build so `export`
//! can encode it.

use sealtag_core::{MeshData, TagParams};
use sealtag_kernel::{BrepKernel, CsgKernel, KernelResult};
use sealtag_settings::Config;
use tokio::sync::{mpsc, oneshot, OnceCell};
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::tag::TagBuilder;

type Reply<T> = oneshot::Sender<Result<T, ServiceError>>;

enum Job {
    Build {
        params: TagParams,
        reply: Reply<MeshData>,
    },
    Sample {
        reply: Reply<MeshData>,
    },
    Export {
        reply: Reply<Vec<u8>>,
    },
}

impl Job {
    fn kind(&self) -> &'static str {
        match self {
            Job::Build { .. } => "build",
            Job::Sample { .. } => "sample",
            Job::Export { .. } => "export",
        }
    }
}

/// Handle to the geometry worker. Cloning shares the same worker.
#[derive(Clone)]
pub struct GeometryService {
    jobs: mpsc::Sender<Job>,
    kernel_name: &'static str,
}

impl GeometryService {
    /// Starts a worker whose kernel is created by `factory` on the worker
    /// thread. Resolves once the kernel is ready.
    pub async fn start<K, F>(config: Config, factory: F) -> Result<Self, ServiceError>
    where
        K: BrepKernel + 'static,
        F: FnOnce() -> KernelResult<K> + Send + 'static,
    {
        config
            .validate()
            .map_err(|e| ServiceError::KernelInit(format!("invalid configuration: {e}")))?;

        let (jobs, receiver) = mpsc::channel(1);
        let (ready_tx, ready_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("sealtag-geometry".to_string())
            .spawn(move || {
                let kernel = match factory() {
                    Ok(kernel) => kernel,
                    Err(e) => {
                        let _ = ready_tx.send(Err(ServiceError::KernelInit(e.to_string())));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(kernel.name()));
                run_worker(kernel, config, receiver);
            })
            .map_err(|e| ServiceError::KernelInit(format!("failed to spawn worker: {e}")))?;

        let kernel_name = ready_rx.await.map_err(|_| ServiceError::WorkerStopped)??;
        info!("Geometry worker ready ({} kernel)", kernel_name);
        Ok(Self { jobs, kernel_name })
    }

    /// Process-wide service over [`CsgKernel`].
    ///
    /// The first call starts the worker with `config`; concurrent first
    /// callers wait for that same start. Later calls return the running
    /// service and ignore their `config`.
    pub async fn shared(config: Config) -> Result<&'static GeometryService, ServiceError> {
        static SHARED: OnceCell<GeometryService> = OnceCell::const_new();
        SHARED
            .get_or_try_init(|| GeometryService::start(config, || Ok(CsgKernel::new())))
            .await
    }

    pub fn kernel_name(&self) -> &'static str {
        self.kernel_name
    }

    /// Builds a tag and returns its preview mesh
    pub async fn build(&self, params: TagParams) -> Result<MeshData, ServiceError> {
        self.submit(|reply| Job::Build { params, reply }).await
    }

    /// Builds the box-minus-sphere sample solid
    pub async fn build_sample(&self) -> Result<MeshData, ServiceError> {
        self.submit(|reply| Job::Sample { reply }).await
    }

    /// Binary STL of the most recently built solid
    pub async fn export(&self) -> Result<Vec<u8>, ServiceError> {
        self.submit(|reply| Job::Export { reply }).await
    }

    async fn submit<T>(&self, job: impl FnOnce(Reply<T>) -> Job) -> Result<T, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send(job(reply))
            .await
            .map_err(|_| ServiceError::WorkerStopped)?;
        response.await.map_err(|_| ServiceError::WorkerStopped)?
    }
}

fn run_worker<K: BrepKernel>(kernel: K, config: Config, mut receiver: mpsc::Receiver<Job>) {
    let mut current: Option<K::Solid> = None;

    while let Some(job) = receiver.blocking_recv() {
        let id = Uuid::new_v4();
        let span = info_span!("geometry_job", %id, kind = job.kind());
        let _guard = span.enter();
        let builder = TagBuilder::new(&kernel, &config);

        match job {
            Job::Build { params, reply } => {
                let result = builder.build(&params).map(|model| {
                    current = Some(model.solid);
                    model.mesh
                });
                if let Err(e) = &result {
                    error!("Build failed: {}", e);
                }
                respond(reply, result.map_err(ServiceError::from));
            }
            Job::Sample { reply } => {
                let result = builder.build_sample().map(|model| {
                    current = Some(model.solid);
                    model.mesh
                });
                respond(reply, result.map_err(ServiceError::from));
            }
            Job::Export { reply } => {
                let result = match &current {
                    Some(solid) => kernel.write_stl(solid).map_err(ServiceError::Export),
                    None => Err(ServiceError::NothingToExport),
                };
                respond(reply, result);
            }
        }
    }
    debug!("Geometry worker shutting down");
}

fn respond<T>(reply: Reply<T>, result: Result<T, ServiceError>) {
    if reply.send(result).is_err() {
        debug!("Caller went away; result discarded");
    }
}
