//! Variance-weighted loading importance

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use super::error::{AnalysisError, AnalysisResult};
use super::pca::Decomposition;

/// Importance score for one original feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub score: f64,
}

/// Rank features by `sum_k |loading_k| * ratio_k` over the first `n_components`
/// components, highest score first.
///
/// A heuristic blend of loading magnitude and each component's share of the
/// variance, not a statistically validated importance measure. Requests for
/// more components than were fitted are clamped.
pub fn rank_features(
    decomposition: &Decomposition,
    n_components: usize,
) -> AnalysisResult<Vec<FeatureImportance>> {
    if n_components == 0 {
        return Err(AnalysisError::InvalidConfig(
            "number of ranking components must be at least 1".to_string(),
        ));
    }

    let names = &decomposition.feature_names;
    if names.len() != decomposition.n_features() {
        return Err(AnalysisError::FeatureMismatch {
            expected: names.len(),
            found: decomposition.n_features(),
        });
    }
    let unique: HashSet<&String> = names.iter().collect();
    if unique.len() != names.len() {
        return Err(AnalysisError::InvalidConfig(
            "feature names must be unique".to_string(),
        ));
    }

    let available = decomposition.n_components();
    let used = if n_components > available {
        warn!(
            requested = n_components,
            available, "fewer components than requested, ranking with all of them"
        );
        available
    } else {
        n_components
    };

    let mut totals = vec![0.0f64; names.len()];
    for component in 0..used {
        let ratio = decomposition.explained_variance_ratio[component];
        for (feature, total) in totals.iter_mut().enumerate() {
            *total += decomposition.loading(component, feature).abs() * ratio;
        }
    }

    let mut ranking: Vec<FeatureImportance> = names
        .iter()
        .zip(totals)
        .map(|(feature, score)| FeatureImportance {
            feature: feature.clone(),
            score,
        })
        .collect();

    // Sort by score descending, ties broken by name for stable output
    ranking.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });

    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    fn decomposition(names: &[&str], loadings: &[&[f64]], ratios: &[f64]) -> Decomposition {
        let mut components = Mat::<f64>::zeros(loadings.len(), names.len());
        for (k, row) in loadings.iter().enumerate() {
            for (f, v) in row.iter().enumerate() {
                components[(k, f)] = *v;
            }
        }
        Decomposition {
            feature_names: names.iter().map(|s| s.to_string()).collect(),
            components,
            explained_variance: ratios.to_vec(),
            explained_variance_ratio: ratios.to_vec(),
        }
    }

    #[test]
    fn test_hand_computed_scores() {
        let d = decomposition(
            &["a", "b"],
            &[&[0.8, -0.6], &[0.6, 0.8]],
            &[0.75, 0.25],
        );
        let ranking = rank_features(&d, 2).unwrap();
        // a: 0.8*0.75 + 0.6*0.25 = 0.75, b: 0.6*0.75 + 0.8*0.25 = 0.65
        assert_eq!(ranking[0].feature, "a");
        assert!((ranking[0].score - 0.75).abs() < 1e-12);
        assert_eq!(ranking[1].feature, "b");
        assert!((ranking[1].score - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_only_leading_components_count() {
        let d = decomposition(
            &["a", "b"],
            &[&[1.0, 0.0], &[0.0, 1.0]],
            &[0.6, 0.4],
        );
        let ranking = rank_features(&d, 1).unwrap();
        assert_eq!(ranking[0].feature, "a");
        assert_eq!(ranking[1].score, 0.0);
    }

    #[test]
    fn test_request_is_clamped() {
        let d = decomposition(&["a"], &[&[1.0]], &[1.0]);
        let ranking = rank_features(&d, 18).unwrap();
        assert_eq!(ranking.len(), 1);
        assert!((ranking[0].score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_components_rejected() {
        let d = decomposition(&["a"], &[&[1.0]], &[1.0]);
        assert!(rank_features(&d, 0).is_err());
    }

    #[test]
    fn test_mismatched_names_rejected() {
        let mut d = decomposition(&["a", "b"], &[&[1.0, 0.0], &[0.0, 1.0]], &[0.5, 0.5]);
        d.feature_names.pop();
        assert!(matches!(
            rank_features(&d, 2),
            Err(AnalysisError::FeatureMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let d = decomposition(&["b", "a"], &[&[0.5, 0.5]], &[1.0]);
        let ranking = rank_features(&d, 1).unwrap();
        assert_eq!(ranking[0].feature, "a");
        assert_eq!(ranking[1].feature, "b");
    }
}
