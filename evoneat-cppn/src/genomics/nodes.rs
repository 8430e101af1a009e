use crate::NodeId;

use serde::{Deserialize, Serialize};

/// The function a node applies to its summed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationType {
    /// Input nodes, which apply no activation.
    Input,
    // x
    Identity,
    // sin(x)
    Sine,
    // cos(x)
    Cosine,
    // exp(-x²)
    Gaussian,
    // tanh(x)
    Sigmoid,
    // sin(x) / x, 1 at 0
    Sinc,
}

impl ActivationType {
    /// All activation types usable by non-input nodes.
    pub const CONTINUOUS: [ActivationType; 6] = [
        ActivationType::Identity,
        ActivationType::Sine,
        ActivationType::Cosine,
        ActivationType::Gaussian,
        ActivationType::Sigmoid,
        ActivationType::Sinc,
    ];

    /// Applies the activation function to `x`.
    /// `NaN` results are replaced by 0.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::ActivationType;
    ///
    /// assert_eq!(ActivationType::Gaussian.apply(0.0), 1.0);
    /// assert_eq!(ActivationType::Sinc.apply(0.0), 1.0);
    /// assert_eq!(ActivationType::Sine.apply(f32::INFINITY), 0.0);
    /// ```
    pub fn apply(self, x: f32) -> f32 {
        let y = match self {
            ActivationType::Input | ActivationType::Identity => x,
            ActivationType::Sine => x.sin(),
            ActivationType::Cosine => x.cos(),
            ActivationType::Gaussian => (-x * x).exp(),
            ActivationType::Sigmoid => x.tanh(),
            ActivationType::Sinc => {
                if x == 0.0 {
                    1.0
                } else {
                    x.sin() / x
                }
            }
        };
        if y.is_nan() {
            0.0
        } else {
            y
        }
    }
}

/// Nodes are the vertices of a genome's graph,
/// and hold its state during propagation.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    activation_type: ActivationType,
    pub(super) value: f32,
    pub(super) previous: f32,
}

impl Node {
    /// Generate a new node with the passed parameters
    /// and zeroed state.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{ActivationType, Node};
    ///
    /// let node = Node::new(5, ActivationType::Sine);
    /// assert_eq!(node.value(), 0.0);
    /// ```
    pub fn new(id: NodeId, activation_type: ActivationType) -> Node {
        Node {
            id,
            activation_type,
            value: 0.0,
            previous: 0.0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn activation_type(&self) -> ActivationType {
        self.activation_type
    }

    pub(super) fn set_activation_type(&mut self, activation_type: ActivationType) {
        self.activation_type = activation_type;
    }

    pub fn is_input(&self) -> bool {
        self.activation_type == ActivationType::Input
    }

    /// Returns the node's value after the last step.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Returns the node's value before the last step.
    pub fn previous(&self) -> f32 {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activations() {
        let x = 0.5f32;
        assert_eq!(ActivationType::Identity.apply(x), x);
        assert_eq!(ActivationType::Input.apply(x), x);
        assert_eq!(ActivationType::Sine.apply(x), x.sin());
        assert_eq!(ActivationType::Cosine.apply(x), x.cos());
        assert_eq!(ActivationType::Gaussian.apply(x), (-0.25f32).exp());
        assert_eq!(ActivationType::Sigmoid.apply(x), x.tanh());
        assert_eq!(ActivationType::Sinc.apply(x), x.sin() / x);
    }

    #[test]
    fn nan_is_suppressed() {
        for activation in ActivationType::CONTINUOUS {
            assert_eq!(activation.apply(f32::NAN), 0.0, "{:?}", activation);
        }
    }

    #[test]
    fn continuous_excludes_input() {
        assert!(!ActivationType::CONTINUOUS.contains(&ActivationType::Input));
    }
}
