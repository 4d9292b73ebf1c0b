//! The closed set of pricing models a backtest can run.

use pricer_core::traits::OptionPricer;
use pricer_core::types::{PricingError, PricingInputs};
use pricer_models::analytical::BlackScholes;
use pricer_models::lattice::{BinomialTree, LatticeError};

use crate::mc::{McError, MonteCarloConfig, MonteCarloEngine};

/// Pricing model, dispatched statically.
///
/// # Examples
///
/// ```rust
/// use pricer_core::traits::OptionPricer;
/// use pricer_pricing::PricingModel;
///
/// let tree = PricingModel::binomial(100).unwrap();
/// assert_eq!(tree.name(), "Binomial Tree");
/// assert_eq!(tree.slug(), "binomial_tree");
/// ```
#[derive(Debug, Clone)]
pub enum PricingModel {
    /// Closed-form Black-Scholes
    BlackScholes(BlackScholes),
    /// Binomial lattice
    Binomial(BinomialTree),
    /// Multi-threaded Monte Carlo
    MonteCarlo(MonteCarloEngine),
}

impl PricingModel {
    /// Closed-form model.
    pub fn black_scholes() -> Self {
        PricingModel::BlackScholes(BlackScholes)
    }

    /// Binomial lattice with `steps` time steps.
    ///
    /// # Errors
    /// `LatticeError::InvalidStepCount` for a zero or oversized step count.
    pub fn binomial(steps: usize) -> Result<Self, LatticeError> {
        Ok(PricingModel::Binomial(BinomialTree::new(steps)?))
    }

    /// Monte Carlo model with its own worker pool.
    ///
    /// # Errors
    /// See [`MonteCarloEngine::new`].
    pub fn monte_carlo(config: MonteCarloConfig) -> Result<Self, McError> {
        Ok(PricingModel::MonteCarlo(MonteCarloEngine::new(config)?))
    }

    /// File-name friendly form of [`OptionPricer::name`]: lower case, with
    /// runs of other characters replaced by one underscore.
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for c in self.name().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('_') {
                slug.push('_');
            }
        }
        slug.trim_end_matches('_').to_string()
    }
}

impl OptionPricer for PricingModel {
    fn name(&self) -> &'static str {
        match self {
            PricingModel::BlackScholes(model) => model.name(),
            PricingModel::Binomial(model) => model.name(),
            PricingModel::MonteCarlo(model) => model.name(),
        }
    }

    fn price(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        match self {
            PricingModel::BlackScholes(model) => model.price(inputs),
            PricingModel::Binomial(model) => model.price(inputs),
            PricingModel::MonteCarlo(model) => model.price(inputs),
        }
    }

    fn delta(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        match self {
            PricingModel::BlackScholes(model) => model.delta(inputs),
            PricingModel::Binomial(model) => model.delta(inputs),
            PricingModel::MonteCarlo(model) => model.delta(inputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_slugs() {
        let config = MonteCarloConfig::builder()
            .n_paths(10)
            .n_steps(1)
            .workers(1)
            .build()
            .unwrap();
        let models = [
            PricingModel::black_scholes(),
            PricingModel::binomial(10).unwrap(),
            PricingModel::monte_carlo(config).unwrap(),
        ];
        let slugs: Vec<String> = models.iter().map(PricingModel::slug).collect();
        assert_eq!(slugs, ["black_scholes", "binomial_tree", "monte_carlo"]);
        assert_eq!(models[0].name(), "Black-Scholes");
    }

    #[test]
    fn test_binomial_rejects_zero_steps() {
        assert!(PricingModel::binomial(0).is_err());
    }

    #[test]
    fn test_enum_delegates_to_variant() {
        let inputs = PricingInputs::new(100.0, 100.0, 0.05, 0.2, 0.5, false);
        let model = PricingModel::black_scholes();
        assert_eq!(
            model.price(&inputs).unwrap(),
            BlackScholes.price(&inputs).unwrap()
        );
        assert_eq!(
            model.delta(&inputs).unwrap(),
            BlackScholes.delta(&inputs).unwrap()
        );
    }
}
