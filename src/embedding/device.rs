use candle_core::Device;
use tracing::{debug, warn};

/// Picks Metal or CUDA when compiled in and present, otherwise the CPU.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            tracing::info!("Embedding on Metal GPU");
            return device;
        }
        Err(e) => warn!(error = %e, "Metal device unavailable"),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            tracing::info!("Embedding on CUDA GPU");
            return device;
        }
        Err(e) => warn!(error = %e, "CUDA device unavailable"),
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!("No GPU device available, embedding on CPU");
    } else {
        debug!("No GPU backend compiled, embedding on CPU");
    }
    Device::Cpu
}
