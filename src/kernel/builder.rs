/*!
 * Kernel Builder
 * Builder pattern for kernel construction
 */

use super::pacing::PacingMode;
use super::stats::AtomicKernelStats;
use super::state::KernelState;
use super::Kernel;
use crate::core::config::KernelConfig;
use crate::core::types::KernelResult;
use crate::cpu::{RandomSource, SeededSource};
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;

/// Builder for `Kernel`
pub struct KernelBuilder {
    config: KernelConfig,
    source: Option<Box<dyn RandomSource>>,
    pacing: PacingMode,
}

impl KernelBuilder {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            source: None,
            pacing: PacingMode::default(),
        }
    }

    /// Replace the instruction-mix source (tests use scripted draws)
    pub fn with_random_source(mut self, source: impl RandomSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Seed the default source so a run can be replayed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_pacing(mut self, pacing: PacingMode) -> Self {
        self.pacing = pacing;
        self
    }

    /// Validate the configuration and assemble the kernel.
    /// The engine is not started; call `Kernel::start`.
    pub fn build(self) -> KernelResult<Kernel> {
        self.config.validate()?;

        let source: Box<dyn RandomSource> = match (self.source, self.config.seed) {
            (Some(source), _) => source,
            (None, Some(seed)) => {
                info!("Instruction mix seeded with {}", seed);
                Box::new(SeededSource::from_seed(seed))
            }
            (None, None) => Box::new(SeededSource::from_entropy()),
        };

        let stats = Arc::new(AtomicKernelStats::new());
        let state = KernelState::new(&self.config, source, Arc::clone(&stats));

        info!(
            "Kernel built: {} units of memory, {} process slots, quantum {} ticks",
            self.config.memory, self.config.max_processes, self.config.quantum_length
        );

        Ok(Kernel {
            state: Arc::new(Mutex::new(state)),
            stats,
            task: Mutex::new(None),
            pacing: self.pacing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{ConfigError, KernelError};

    #[test]
    fn test_build_rejects_invalid_config() {
        let result = KernelBuilder::new(KernelConfig::new(0, 4)).build();
        assert!(matches!(
            result,
            Err(KernelError::Config(ConfigError::Invalid { field: "memory", .. }))
        ));
    }

    #[test]
    fn test_build_with_seed() {
        let kernel = KernelBuilder::new(KernelConfig::new(512, 4))
            .with_seed(7)
            .with_pacing(PacingMode::Immediate)
            .build()
            .unwrap();
        assert_eq!(kernel.snapshot().total_memory, 512);
        assert_eq!(kernel.pacing(), PacingMode::Immediate);
    }
}
