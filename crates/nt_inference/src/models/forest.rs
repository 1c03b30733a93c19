use std::fmt;
use std::path::Path;

use nt_core::{Error, Result, SourceAttributor, SourcePrediction, StyleFeatures, STYLE_FEATURE_COUNT};
use serde::Deserialize;

use super::{read_artifact, round3};

#[derive(Debug, Deserialize)]
pub struct ForestArtifact {
    pub classes: Vec<String>,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Debug, Deserialize)]
pub struct TreeArtifact {
    pub nodes: Vec<NodeArtifact>,
}

/// One node as exported from the trained forest. Leaves carry `left == right == -1`.
#[derive(Debug, Deserialize)]
pub struct NodeArtifact {
    #[serde(default)]
    pub feature: i64,
    #[serde(default)]
    pub threshold: f64,
    pub left: i64,
    pub right: i64,
    #[serde(default)]
    pub value: Vec<f64>,
}

#[derive(Debug)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class distribution, normalized to sum to one.
    Leaf(Vec<f64>),
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf(&self, features: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => index = if features[*feature] <= *threshold { *left } else { *right },
                Node::Leaf(distribution) => return distribution,
            }
        }
    }
}

/// Random-forest attributor over style fingerprints. Immutable once loaded.
pub struct RandomForestAttributor {
    classes: Vec<String>,
    trees: Vec<Tree>,
}

impl fmt::Debug for RandomForestAttributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomForestAttributor")
            .field("classes", &self.classes)
            .field("trees", &self.trees.len())
            .finish()
    }
}

fn child(tree: usize, node: usize, raw: i64, len: usize) -> Result<usize> {
    // children always come after their parent, which rules out cycles
    match usize::try_from(raw) {
        Ok(i) if i > node && i < len => Ok(i),
        _ => Err(Error::Model(format!(
            "tree {} node {} has invalid child index {}",
            tree, node, raw
        ))),
    }
}

fn build_tree(tree: usize, artifact: TreeArtifact, classes: usize) -> Result<Tree> {
    let len = artifact.nodes.len();
    if len == 0 {
        return Err(Error::Model(format!("tree {} has no nodes", tree)));
    }

    let mut nodes = Vec::with_capacity(len);
    for (index, node) in artifact.nodes.into_iter().enumerate() {
        if node.left < 0 && node.right < 0 {
            let total: f64 = node.value.iter().sum();
            if node.value.len() != classes || total <= 0.0 {
                return Err(Error::Model(format!(
                    "tree {} leaf {} has {} values for {} classes",
                    tree,
                    index,
                    node.value.len(),
                    classes
                )));
            }
            nodes.push(Node::Leaf(node.value.iter().map(|v| v / total).collect()));
            continue;
        }

        let feature = usize::try_from(node.feature)
            .ok()
            .filter(|f| *f < STYLE_FEATURE_COUNT)
            .ok_or_else(|| {
                Error::Model(format!("tree {} node {} splits on feature {}", tree, index, node.feature))
            })?;
        nodes.push(Node::Split {
            feature,
            threshold: node.threshold,
            left: child(tree, index, node.left, len)?,
            right: child(tree, index, node.right, len)?,
        });
    }
    Ok(Tree { nodes })
}

impl RandomForestAttributor {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_artifact(read_artifact(path)?)
    }

    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self> {
        if artifact.classes.is_empty() {
            return Err(Error::Model("source model has no classes".to_string()));
        }
        if artifact.trees.is_empty() {
            return Err(Error::Model("source model has no trees".to_string()));
        }

        let classes = artifact.classes.len();
        let trees = artifact
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| build_tree(i, tree, classes))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            classes: artifact.classes,
            trees,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Mean class distribution over all trees.
    pub fn probabilities(&self, features: &StyleFeatures) -> Vec<f64> {
        let mut sums = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (sum, p) in sums.iter_mut().zip(tree.leaf(features.as_slice())) {
                *sum += p;
            }
        }
        let n = self.trees.len() as f64;
        sums.into_iter().map(|s| s / n).collect()
    }
}

impl SourceAttributor for RandomForestAttributor {
    fn name(&self) -> &str {
        "random-forest"
    }

    fn predict(&self, features: &StyleFeatures) -> SourcePrediction {
        let probabilities = self.probabilities(features);
        // first maximum wins on ties
        let (best, confidence) = probabilities
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, p)| if *p > acc.1 { (i, *p) } else { acc });

        SourcePrediction {
            predicted_source: self.classes[best].clone(),
            confidence: round3(confidence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: Vec<f64>) -> NodeArtifact {
        NodeArtifact {
            feature: -2,
            threshold: -2.0,
            left: -1,
            right: -1,
            value,
        }
    }

    fn split(feature: i64, threshold: f64, left: i64, right: i64) -> NodeArtifact {
        NodeArtifact {
            feature,
            threshold,
            left,
            right,
            value: vec![],
        }
    }

    fn forest() -> ForestArtifact {
        ForestArtifact {
            classes: vec!["Reuters".to_string(), "Tabloid".to_string()],
            trees: vec![
                // long sentences look like Reuters
                TreeArtifact {
                    nodes: vec![split(0, 15.0, 1, 2), leaf(vec![0.0, 10.0]), leaf(vec![9.0, 1.0])],
                },
                // negative polarity looks like the tabloid
                TreeArtifact {
                    nodes: vec![split(2, -0.1, 1, 2), leaf(vec![1.0, 3.0]), leaf(vec![4.0, 0.0])],
                },
            ],
        }
    }

    fn features(avg_len: f64, polarity: f64) -> StyleFeatures {
        let mut values = [0.0; STYLE_FEATURE_COUNT];
        values[0] = avg_len;
        values[2] = polarity;
        StyleFeatures(values)
    }

    #[test]
    fn test_probabilities_are_averaged_leaf_distributions() {
        let model = RandomForestAttributor::from_artifact(forest()).unwrap();
        let probs = model.probabilities(&features(22.0, 0.1));
        assert!((probs[0] - 0.95).abs() < 1e-9);
        assert!((probs[1] - 0.05).abs() < 1e-9);

        let prediction = model.predict(&features(22.0, 0.1));
        assert_eq!(prediction.predicted_source, "Reuters");
        assert_eq!(prediction.confidence, 0.95);
    }

    #[test]
    fn test_predict_other_class() {
        let model = RandomForestAttributor::from_artifact(forest()).unwrap();
        let prediction = model.predict(&features(8.0, -0.6));
        assert_eq!(prediction.predicted_source, "Tabloid");
        assert_eq!(prediction.confidence, 0.875);
    }

    #[test]
    fn test_invalid_structure_is_rejected() {
        let mut bad = forest();
        bad.trees[0].nodes[0].left = 0;
        assert!(matches!(RandomForestAttributor::from_artifact(bad), Err(Error::Model(_))));

        let mut bad = forest();
        bad.trees[1].nodes[2].value = vec![1.0];
        assert!(matches!(RandomForestAttributor::from_artifact(bad), Err(Error::Model(_))));

        let mut bad = forest();
        bad.trees[0].nodes[0].feature = 12;
        assert!(matches!(RandomForestAttributor::from_artifact(bad), Err(Error::Model(_))));

        let mut bad = forest();
        bad.classes.clear();
        assert!(RandomForestAttributor::from_artifact(bad).is_err());
    }
}
