use crate::{
    error::{ConfigError, Result},
    rule::{Attachment, AttachmentRule},
};

/// When a node that reached the threshold is moved into the saturation set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaturationPolicy {
    /// Checked once per node per step, just before its attachment attempt.
    /// A node can finish a step above the threshold.
    #[default]
    Checkpoint,
    /// Checked after every edge, including for the newcomer, so the
    /// threshold is a hard cap.
    StrictCap,
}

/// Construction parameters for one growth run.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthConfig {
    /// Number of nodes in the final graph, seed nodes included.
    pub target_node_count: usize,
    /// Attachment degree at which a node stops receiving edges.
    pub saturation_threshold: u32,
    pub directed: bool,
    pub attachment: Attachment,
    /// Seed for the run's random source; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub saturation_policy: SaturationPolicy,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            target_node_count: 200,
            saturation_threshold: 125,
            directed: false,
            attachment: Attachment::default(),
            seed: None,
            saturation_policy: SaturationPolicy::Checkpoint,
        }
    }
}

impl GrowthConfig {
    /// Checks the size and threshold parameters.
    ///
    /// Uniform probabilities are already checked by [`crate::rule::Uniform::new`].
    ///
    /// # Errors
    /// Returns [`crate::GrowthError::InvalidConfiguration`] describing the
    /// first rejected parameter.
    pub fn validate(&self) -> Result<()> {
        if self.target_node_count < 2 {
            return Err(ConfigError::TargetTooSmall {
                got: self.target_node_count,
            }
            .into());
        }
        if self.saturation_threshold == 0 {
            return Err(ConfigError::ZeroThreshold.into());
        }
        Ok(())
    }

    /// Number of growth steps a run performs.
    pub fn total_steps(&self) -> usize {
        self.target_node_count.saturating_sub(2)
    }

    pub(crate) fn rule(&self) -> Box<dyn AttachmentRule> {
        Box::new(self.attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrowthError;

    use rstest::rstest;

    #[test]
    fn default_matches_binomial_script() {
        let cfg = GrowthConfig::default();
        assert_eq!(cfg.target_node_count, 200);
        assert_eq!(cfg.saturation_threshold, 125);
        assert!(!cfg.directed);
        assert_eq!(cfg.attachment, Attachment::uniform(0.5).expect("in range"));
        assert_eq!(cfg.saturation_policy, SaturationPolicy::Checkpoint);
        assert!(cfg.validate().is_ok());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn rejects_targets_below_two(#[case] target: usize) {
        let cfg = GrowthConfig {
            target_node_count: target,
            ..GrowthConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(GrowthError::InvalidConfiguration(
                ConfigError::TargetTooSmall { got: target }
            ))
        );
    }

    #[test]
    fn rejects_zero_threshold() {
        let cfg = GrowthConfig {
            saturation_threshold: 0,
            ..GrowthConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(GrowthError::InvalidConfiguration(ConfigError::ZeroThreshold))
        );
    }

    #[rstest]
    #[case(2, 0)]
    #[case(3, 1)]
    #[case(200, 198)]
    fn total_steps_excludes_seed_nodes(#[case] target: usize, #[case] steps: usize) {
        let cfg = GrowthConfig {
            target_node_count: target,
            ..GrowthConfig::default()
        };
        assert_eq!(cfg.total_steps(), steps);
    }
}
