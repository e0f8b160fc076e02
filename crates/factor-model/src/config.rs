//! Training hyperparameters and their validation.

use crate::TrainError;

/// Hyperparameters for the alternating-least-squares trainer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlsConfig {
    /// Latent factor count k (embedding dimensionality)
    pub factors: usize,
    /// Regularization strength penalizing factor magnitude
    pub regularization: f32,
    /// Fixed number of alternating sweeps; there is no convergence-based
    /// early stop
    pub iterations: usize,
    /// Confidence scaling: an interaction of weight r carries confidence
    /// 1 + alpha * r
    pub alpha: f32,
    /// Seed for factor initialization; a fixed seed makes training
    /// deterministic
    pub seed: u64,
}

impl Default for AlsConfig {
    fn default() -> Self {
        Self {
            factors: 64,
            regularization: 0.01,
            iterations: 15,
            alpha: 1.0,
            seed: 42,
        }
    }
}

impl AlsConfig {
    /// Reject invalid hyperparameters outright; nothing is clamped.
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.factors == 0 {
            return Err(TrainError::InvalidConfig(
                "factor count must be positive".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(TrainError::InvalidConfig(
                "iteration count must be positive".to_string(),
            ));
        }
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(TrainError::InvalidConfig(format!(
                "regularization must be non-negative, got {}",
                self.regularization
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(TrainError::InvalidConfig(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AlsConfig::default();
        assert_eq!(config.factors, 64);
        assert_eq!(config.regularization, 0.01);
        assert_eq!(config.iterations, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_factors_rejected() {
        let config = AlsConfig {
            factors: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = AlsConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_regularization_rejected() {
        let config = AlsConfig {
            regularization: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_alpha_rejected() {
        let config = AlsConfig {
            alpha: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
