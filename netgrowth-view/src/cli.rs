//! Command-line construction parameters for the initial run.

use clap::{Parser, ValueEnum};
use netgrowth_core::{Attachment, GrowthConfig, GrowthError, SaturationPolicy};

/// Attachment rule selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    /// Constant probability given by `--probability`.
    Uniform,
    /// Probability proportional to the candidate's degree.
    Preferential,
}

/// Grow a network and watch it evolve.
#[derive(Debug, Parser)]
#[command(name = "netgrowth", version)]
pub struct Cli {
    /// Total number of nodes in the final graph.
    #[arg(long, default_value_t = 200)]
    pub nodes: usize,
    /// Degree at which a node stops receiving edges.
    #[arg(long, default_value_t = 125)]
    pub threshold: u32,
    /// Grow a directed graph.
    #[arg(long)]
    pub directed: bool,
    #[arg(long, value_enum, default_value_t = RuleArg::Uniform)]
    pub rule: RuleArg,
    /// Attachment probability for the uniform rule.
    #[arg(long, default_value_t = 0.5)]
    pub probability: f64,
    /// Seed for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Saturate nodes the moment they reach the threshold.
    #[arg(long)]
    pub strict_cap: bool,
}

impl Cli {
    /// Maps the flags onto a validated [`GrowthConfig`].
    ///
    /// # Errors
    /// Returns [`GrowthError::InvalidConfiguration`] for out-of-range values.
    pub fn into_config(self) -> Result<GrowthConfig, GrowthError> {
        let attachment = match self.rule {
            RuleArg::Uniform => Attachment::uniform(self.probability)?,
            RuleArg::Preferential => Attachment::preferential(),
        };
        let config = GrowthConfig {
            target_node_count: self.nodes,
            saturation_threshold: self.threshold,
            directed: self.directed,
            attachment,
            seed: self.seed,
            saturation_policy: if self.strict_cap {
                SaturationPolicy::StrictCap
            } else {
                SaturationPolicy::Checkpoint
            },
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netgrowth_core::ConfigError;

    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("netgrowth").chain(args.iter().copied()))
            .expect("arguments must parse")
    }

    #[test]
    fn defaults_map_to_default_config() {
        let cfg = parse(&[]).into_config().expect("defaults are valid");
        assert_eq!(cfg, GrowthConfig::default());
    }

    #[test]
    fn flags_map_onto_config_fields() {
        let cfg = parse(&[
            "--nodes",
            "50",
            "--threshold",
            "3",
            "--directed",
            "--rule",
            "preferential",
            "--seed",
            "9",
            "--strict-cap",
        ])
        .into_config()
        .expect("valid flags");

        assert_eq!(cfg.target_node_count, 50);
        assert_eq!(cfg.saturation_threshold, 3);
        assert!(cfg.directed);
        assert_eq!(cfg.attachment, Attachment::preferential());
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.saturation_policy, SaturationPolicy::StrictCap);
    }

    #[rstest]
    #[case(&["--nodes", "1"], ConfigError::TargetTooSmall { got: 1 })]
    #[case(&["--threshold", "0"], ConfigError::ZeroThreshold)]
    #[case(&["--probability", "1.5"], ConfigError::ProbabilityOutOfRange { got: 1.5 })]
    fn invalid_values_are_rejected(#[case] args: &[&str], #[case] expected: ConfigError) {
        let err = parse(args).into_config().expect_err("values are invalid");
        assert_eq!(err, GrowthError::InvalidConfiguration(expected));
    }
}
