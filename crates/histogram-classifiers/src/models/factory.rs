use crate::config::{ModelConfig, ModelType};
use crate::error::Result;
use crate::models::classifier_trait::HistogramClassifier;
use crate::models::decision_tree::DecisionTree;
use crate::models::naive_bayes::NaiveBayes;

/// Build a boxed, untrained classifier from a `ModelConfig`.
///
/// Fails only when the configuration itself is invalid (zero feature count,
/// bad grid-search ranges).
pub fn build_model(config: ModelConfig) -> Result<Box<dyn HistogramClassifier>> {
    log::trace!("Building {:?} for {} features", config.model_type, config.feature_count);
    match config.model_type {
        ModelType::DecisionTree {
            min_gain,
            prune,
            merge_criterion,
        } => Ok(Box::new(
            DecisionTree::new(config.feature_count)?
                .with_min_gain(min_gain)
                .with_pruning(prune)
                .with_merge_criterion(merge_criterion),
        )),

        ModelType::NaiveBayes => Ok(Box::new(NaiveBayes::new(config.feature_count)?)),

        #[cfg(feature = "linfa")]
        ModelType::Svm { parameters } => {
            if let crate::config::SvmParameterSelection::GridSearch(grid) = &parameters {
                grid.validate()?;
            }
            Ok(Box::new(
                crate::models::svm::SvmClassifier::new(config.feature_count)?
                    .with_parameter_selection(parameters),
            ))
        } // `ModelType` only contains the variants enabled by features, so the
          // arms above are exhaustive for the compiled enum.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergeCriterion;
    use crate::error::ClassifierError;

    #[test]
    fn builds_untrained_models() {
        for name in ["tree", "naive_bayes"] {
            let model_type = name.parse::<ModelType>().unwrap();
            let model = build_model(ModelConfig::new(4, model_type)).unwrap();
            assert_eq!(model.feature_count(), 4);
            assert!(!model.is_trained());
            assert!(model.class_names().is_empty());
        }
    }

    #[test]
    fn zero_feature_count_is_rejected() {
        let config = ModelConfig::new(0, ModelType::NaiveBayes);
        assert!(matches!(
            build_model(config),
            Err(ClassifierError::Configuration(_))
        ));
    }

    #[test]
    fn unpruned_tree_keeps_every_split() {
        let config = ModelConfig::new(
            1,
            ModelType::DecisionTree {
                min_gain: 10.0,
                prune: false,
                merge_criterion: MergeCriterion::Legacy,
            },
        );
        let mut model = build_model(config).unwrap();
        let dataset = [
            ("a", vec![vec![1], vec![2]]),
            ("b", vec![vec![8], vec![9]]),
        ]
        .into_iter()
        .collect();
        model.learn(&dataset).unwrap();
        assert_eq!(model.name(), "decision_tree");
        assert_eq!(model.classify(&[0]).unwrap(), "a");
        assert_eq!(model.classify(&[10]).unwrap(), "b");
    }

    #[cfg(feature = "linfa")]
    #[test]
    fn svm_grid_is_validated_up_front() {
        use crate::config::{GridSearchConfig, SvmParameterSelection};

        let grid = GridSearchConfig {
            folds: 0,
            ..GridSearchConfig::default()
        };
        let config = ModelConfig::new(
            3,
            ModelType::Svm {
                parameters: SvmParameterSelection::GridSearch(grid),
            },
        );
        assert!(build_model(config).is_err());
    }
}
