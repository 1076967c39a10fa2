//! Explicit CPU usage sampler.
//!
//! sysinfo computes CPU usage as the delta between two refreshes. The sampler
//! owns that baseline: it is primed once at startup, and every call to
//! [`CpuSampler::sample`] reports usage since the previous call.

use parking_lot::Mutex;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::metrics::CpuSample;

pub struct CpuSampler {
    system: Mutex<System>,
}

impl CpuSampler {
    /// Create the sampler and take the initial baseline reading.
    pub fn new() -> Self {
        let refresh_kind =
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage());
        let mut system = System::new_with_specifics(refresh_kind);
        system.refresh_cpu_usage();

        log::debug!("CPU sampler primed with {} cores", system.cpus().len());

        Self {
            system: Mutex::new(system),
        }
    }

    /// Usage since the previous sample (or since startup on the first call).
    pub fn sample(&self) -> CpuSample {
        let mut system = self.system.lock();
        system.refresh_cpu_usage();

        let cpus = system.cpus();
        CpuSample {
            cpu_count: cpus.len(),
            average: system.global_cpu_usage(),
            per_core: cpus.iter().map(|cpu| cpu.cpu_usage()).collect(),
        }
    }
}

impl Default for CpuSampler {
    fn default() -> Self {
        Self::new()
    }
}
