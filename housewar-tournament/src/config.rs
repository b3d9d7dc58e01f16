//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use housewar_core::Layout;
use serde::{Deserialize, Serialize};

/// Iterations per battle handed to the simulator
pub const DEFAULT_BATTLE_ROUNDS: u32 = 1000;

/// External simulator invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Simulator executable
    pub program: PathBuf,
    /// Iteration budget passed with `-r`
    pub rounds: u32,
    /// Arguments placed between the round budget and the two artifacts
    pub extra_args: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pmars"),
            rounds: DEFAULT_BATTLE_ROUNDS,
            extra_args: vec!["-f".to_string()],
        }
    }
}

impl SimulatorConfig {
    /// Use a different simulator executable
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the iteration budget
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }
}

/// Tournament configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Where trackers, ledger and logs live
    pub layout: Layout,
    /// Simulator invocation
    pub simulator: SimulatorConfig,
    /// Normalize trackers before scheduling (disable to resume a run)
    pub normalize: bool,
    /// Random seed for draws (None = entropy)
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            simulator: SimulatorConfig::default(),
            normalize: true,
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Fresh run with default layout and simulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: TournamentConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Rebase the layout onto a root directory
    pub fn rooted(mut self, root: &Path) -> Self {
        self.layout = self.layout.rooted(root);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Skip normalization (resume with the trackers as they are)
    pub fn without_normalize(mut self) -> Self {
        self.normalize = false;
        self
    }

    /// Set simulator configuration
    pub fn with_simulator(mut self, simulator: SimulatorConfig) -> Self {
        self.simulator = simulator;
        self
    }
}
