//! Periodic resource usage sampling.
//!
//! A long-lived background task that reads host or process counters on a
//! fixed interval and emits one log record per tick. It owns its counter
//! source and shares nothing with request handling except the log sinks, so
//! sampling can never slow a request down.
//!
//! A failed counter read logs a warning and skips that tick; the loop only
//! exits on shutdown.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sysinfo::{CpuExt, DiskExt, ProcessExt, System, SystemExt};
use tokio::sync::broadcast;
use tokio::time;

use crate::config::schema::SamplerConfig;

/// Which counters a deployment samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleScope {
    /// Aggregate CPU/RAM/disk across the whole machine.
    Host,
    /// This process's own CPU and resident memory.
    Process,
}

/// One reading of the configured counters.
#[derive(Debug, Clone, PartialEq)]
enum SampleRecord {
    Host {
        cpu_percent: f64,
        memory_percent: f64,
        disk_percent: f64,
    },
    Process {
        cpu_percent: f64,
        memory_bytes: u64,
    },
}

/// Side-effect-free counter reads against the OS.
///
/// A failed read returns the reason; the sampler logs it and carries on.
trait CounterSource: Send {
    fn sample(&mut self, scope: SampleScope) -> Result<SampleRecord, String>;
}

/// Counter source backed by `sysinfo`.
struct SysinfoCounters {
    system: System,
}

impl SysinfoCounters {
    fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl CounterSource for SysinfoCounters {
    fn sample(&mut self, scope: SampleScope) -> Result<SampleRecord, String> {
        match scope {
            SampleScope::Host => {
                self.system.refresh_cpu();
                self.system.refresh_memory();
                self.system.refresh_disks();

                let cpu_percent = self.system.global_cpu_info().cpu_usage() as f64;
                let memory_percent =
                    usage_percent(self.system.used_memory(), self.system.total_memory())
                        .ok_or_else(|| "memory counters unavailable".to_string())?;

                // Prefer the root filesystem; fall back to the first disk listed.
                let root = std::path::Path::new("/");
                let disk = self
                    .system
                    .disks()
                    .iter()
                    .find(|d| d.mount_point() == root)
                    .or_else(|| self.system.disks().first())
                    .ok_or_else(|| "no disks found".to_string())?;
                let disk_percent =
                    usage_percent(disk.total_space() - disk.available_space(), disk.total_space())
                        .ok_or_else(|| "disk counters unavailable".to_string())?;

                Ok(SampleRecord::Host {
                    cpu_percent,
                    memory_percent,
                    disk_percent,
                })
            }
            SampleScope::Process => {
                let pid = sysinfo::get_current_pid()
                    .map_err(|e| format!("cannot determine current PID: {}", e))?;
                if !self.system.refresh_process(pid) {
                    return Err(format!("process counters unavailable for {:?}", pid));
                }
                let process = self
                    .system
                    .process(pid)
                    .ok_or_else(|| format!("process {:?} not found", pid))?;

                Ok(SampleRecord::Process {
                    cpu_percent: process.cpu_usage() as f64,
                    memory_bytes: process.memory(),
                })
            }
        }
    }
}

/// Background task emitting one resource snapshot per interval.
pub struct ResourceSampler {
    counters: Box<dyn CounterSource>,
    scope: SampleScope,
    interval: Duration,
}

impl ResourceSampler {
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            counters: Box::new(SysinfoCounters::new()),
            scope: config.scope,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    #[cfg(test)]
    fn with_counters(counters: Box<dyn CounterSource>, config: &SamplerConfig) -> Self {
        Self {
            counters,
            scope: config.scope,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    /// Run the sampling loop until the shutdown signal fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            scope = ?self.scope,
            "Resource sampler starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sample_once();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Resource sampler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn sample_once(&mut self) {
        match self.counters.sample(self.scope) {
            Ok(SampleRecord::Host {
                cpu_percent,
                memory_percent,
                disk_percent,
            }) => {
                tracing::info!(cpu_percent, memory_percent, disk_percent, "System stats");
            }
            Ok(SampleRecord::Process {
                cpu_percent,
                memory_bytes,
            }) => {
                tracing::info!(cpu_percent, memory_bytes, "Process stats");
            }
            Err(reason) => {
                tracing::warn!(%reason, "Counter read failed, skipping sample");
            }
        }
    }
}

/// Percentage of `used` over `total`, or `None` when `total` is zero
/// (counter unavailable).
fn usage_percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(used as f64 / total as f64 * 100.0)
}

/// Emit a one-time snapshot of static host facts at startup.
pub fn log_system_info() {
    let system = System::new_all();
    tracing::info!(
        os = %system.name().unwrap_or_default(),
        os_version = %system.os_version().unwrap_or_default(),
        cpu_cores = system.cpus().len(),
        total_memory_gb = system.total_memory() as f64 / (1024.0 * 1024.0 * 1024.0),
        "System info"
    );
}
