//! Shared Tokio runtime for GlucoGrade
//!
//! Hosts without their own async runtime (the FFI layer) register one
//! process-wide runtime here. `block_on` drives async work such as table
//! loading from synchronous entry points.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};

/// Set once by the host, read by every sync entry point
static GLOBAL_RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Register the process-wide runtime. Later registrations are ignored
pub fn register_runtime(runtime: Arc<Runtime>) {
    if GLOBAL_RUNTIME.set(runtime).is_ok() {
        tracing::debug!("Global Tokio runtime registered with glucograde-core");
    }
}

/// Get the registered runtime, if available
pub fn get_runtime() -> Option<&'static Arc<Runtime>> {
    GLOBAL_RUNTIME.get()
}

/// Run `future` to completion from a synchronous context.
///
/// Uses the registered runtime when there is one, otherwise a temporary
/// current-thread runtime. When called from inside a runtime the future is
/// driven on a scoped helper thread, since `block_on` cannot nest.
pub fn block_on<F, T>(future: F) -> Result<T>
where
    F: std::future::Future<Output = T> + Send,
    T: Send,
{
    let inside_runtime = Handle::try_current().is_ok();

    match GLOBAL_RUNTIME.get() {
        Some(rt) if inside_runtime => {
            let rt = Arc::clone(rt);
            std::thread::scope(|s| {
                s.spawn(move || rt.block_on(future))
                    .join()
                    .map_err(|_| anyhow::anyhow!("Runtime helper thread panicked"))
            })
        }
        Some(rt) => Ok(rt.block_on(future)),
        None if inside_runtime => std::thread::scope(|s| {
            s.spawn(|| temporary_runtime().map(|rt| rt.block_on(future)))
                .join()
                .map_err(|_| anyhow::anyhow!("Runtime helper thread panicked"))?
        }),
        None => {
            tracing::debug!("No global runtime registered, using a temporary one");
            Ok(temporary_runtime()?.block_on(future))
        }
    }
}

fn temporary_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create temporary Tokio runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_without_registered_runtime() {
        let value = block_on(async { 21 * 2 }).unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_block_on_inside_runtime() {
        let value = block_on(async { "nested" }).unwrap();
        assert_eq!(value, "nested");
    }
}
