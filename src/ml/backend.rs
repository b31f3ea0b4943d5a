// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// The compute backend is chosen once, at startup:
//
//   gpu → Wgpu (Vulkan / Metal / DX12 through wgpu)
//   cpu → NdArray
//
// A GPU request is only a preference. When wgpu cannot find an
// adapter the run falls back to NdArray with an info line.
//
// Training wraps either in Autodiff; evaluation uses the plain
// backend. Everything else in the crate is generic over
// `B: Backend`, so this is the only place that names them.

use burn::prelude::*;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::panic;

pub type GpuBackend = burn::backend::Wgpu;
pub type CpuBackend = burn::backend::NdArray;

pub type GpuTrainBackend = burn::backend::Autodiff<GpuBackend>;
pub type CpuTrainBackend = burn::backend::Autodiff<CpuBackend>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Gpu,
    Cpu,
}

impl DeviceKind {
    pub fn gpu_device() -> burn::backend::wgpu::WgpuDevice {
        burn::backend::wgpu::WgpuDevice::default()
    }

    pub fn cpu_device() -> burn::backend::ndarray::NdArrayDevice {
        burn::backend::ndarray::NdArrayDevice::Cpu
    }

    /// Settle the requested device for this run and log the choice.
    pub fn resolve(self) -> DeviceKind {
        self.resolve_with(gpu_available)
    }

    /// `resolve` with the adapter check supplied by the caller.
    /// The check only runs for a GPU request.
    pub fn resolve_with(self, gpu_available: impl FnOnce() -> bool) -> DeviceKind {
        let resolved = match self {
            DeviceKind::Gpu if !gpu_available() => {
                tracing::info!("GPU not available. This run operates on the CPU.");
                DeviceKind::Cpu
            }
            kind => kind,
        };

        match resolved {
            DeviceKind::Gpu => tracing::info!("Using WGPU device: {:?}", Self::gpu_device()),
            DeviceKind::Cpu => tracing::info!("Using NdArray CPU device"),
        }
        resolved
    }
}

/// Whether wgpu can run a kernel on this machine.
///
/// The wgpu runtime panics on first use when no adapter exists, so the
/// check allocates a one-element tensor and catches that panic. The
/// default hook is muted meanwhile to keep the message off stderr.
pub fn gpu_available() -> bool {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));

    let probe = panic::catch_unwind(|| {
        Tensor::<GpuBackend, 1>::from_floats([0.0], &DeviceKind::gpu_device()).into_data()
    });

    panic::set_hook(hook);
    probe.is_ok()
}
