//! Battle simulator adapter - runs the external combat program
//!
//! Level 3 - Step-level implementation

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::SimulatorConfig;

/// Errors launching the simulator
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs one battle between two artifacts and returns the final report line
pub trait BattleSimulator {
    fn battle(&mut self, a: &Path, b: &Path, rounds: u32) -> Result<String, SimulatorError>;
}

/// `pmars -r <rounds> <extra args> <a> <b>`
#[derive(Clone, Debug)]
pub struct PmarsSimulator {
    config: SimulatorConfig,
}

impl PmarsSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }
}

impl BattleSimulator for PmarsSimulator {
    fn battle(&mut self, a: &Path, b: &Path, rounds: u32) -> Result<String, SimulatorError> {
        // Blocks until the simulator exits; there is no timeout
        let output = Command::new(&self.config.program)
            .arg("-r")
            .arg(rounds.to_string())
            .args(&self.config.extra_args)
            .arg(a)
            .arg(b)
            .output()
            .map_err(|source| SimulatorError::Launch {
                program: self.config.program.clone(),
                source,
            })?;

        if !output.status.success() {
            tracing::debug!(
                "{} exited with {} for {} vs {}",
                self.config.program.display(),
                output.status,
                a.display(),
                b.display()
            );
        }

        Ok(last_line(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Final non-empty line of simulator output ("" when there is none)
pub fn last_line(stdout: &str) -> String {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_line() {
        assert_eq!(last_line("scores...\nResults: 12 3 5\n"), "Results: 12 3 5");
        assert_eq!(last_line("Results: 1 1 1\n\n  \n"), "Results: 1 1 1");
        assert_eq!(last_line(""), "");
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let config = SimulatorConfig::default().with_program("/nonexistent/housewar-pmars");
        let mut sim = PmarsSimulator::new(config);
        let err = sim
            .battle(Path::new("a.red"), Path::new("b.red"), 10)
            .unwrap_err();
        assert!(matches!(err, SimulatorError::Launch { .. }));
    }
}
