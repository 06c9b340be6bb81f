use std::fs;
use std::io::{Read, Write};
use std::iter::FusedIterator;
use std::path::Path;
use std::slice;

use bincode::{deserialize, serialize};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::NetworkOptions;
use crate::error::{DigitNetError, Result};
use crate::layers::{Layer, LayerRole, LayerSpec};

/// Direction of a layer traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A cursor over the layers of a network, in insertion order or in reverse.
///
/// Each call to [`Network::traverse`] returns an independent cursor that owns
/// its position; any number of them may be alive at once.
#[derive(Clone, Debug)]
pub struct Traversal<'a> {
    layers: slice::Iter<'a, Layer>,
    direction: Direction,
}

impl<'a> Iterator for Traversal<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<&'a Layer> {
        match self.direction {
            Direction::Forward => self.layers.next(),
            Direction::Backward => self.layers.next_back(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.layers.size_hint()
    }
}

impl<'a> DoubleEndedIterator for Traversal<'a> {
    fn next_back(&mut self) -> Option<&'a Layer> {
        match self.direction {
            Direction::Forward => self.layers.next_back(),
            Direction::Backward => self.layers.next(),
        }
    }
}

impl<'a> ExactSizeIterator for Traversal<'a> {}

impl<'a> FusedIterator for Traversal<'a> {}

fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

fn rng_for(options: &NetworkOptions) -> StdRng {
    match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => entropy_rng(),
    }
}

/// An ordered, position-addressable sequence of layers plus the options used
/// to initialize them.
///
/// Positions are 1-based. Layer `i`'s weights are always shaped for the node
/// count of layer `i - 1` (or own no weights when `i` is the first layer).
/// Inserting or deleting a layer re-initializes the layer that follows the
/// edit so the invariant holds again; both steps happen inside one `&mut self`
/// call, so no reader can observe the network in between.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Network {
    options: NetworkOptions,
    layers: Vec<Layer>,
    #[serde(skip, default = "entropy_rng")]
    rng: StdRng,
}

impl Network {
    /// Build a network left to right from `specs`, each layer shaped against
    /// the node count of the entry before it.
    pub fn new(options: NetworkOptions, specs: &[LayerSpec]) -> Result<Self> {
        options.validate()?;
        let rng = rng_for(&options);
        let mut network = Network {
            options,
            layers: Vec::with_capacity(specs.len()),
            rng,
        };

        for spec in specs {
            network.append_layer(spec.node_count, spec.role)?;
        }

        log::debug!("created network with {} layers: {:?}", network.len(), network.node_counts());
        Ok(network)
    }

    pub fn options(&self) -> &NetworkOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn node_counts(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::node_count).collect()
    }

    /// Node count of the last layer, if any.
    pub fn output_node_count(&self) -> Option<usize> {
        self.layers.last().map(Layer::node_count)
    }

    fn predecessor_count(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.layers[index - 1].node_count()
        }
    }

    /// Append a layer shaped against the current last layer.
    pub fn append_layer(&mut self, node_count: usize, role: LayerRole) -> Result<()> {
        let prev_count = self.predecessor_count(self.layers.len());
        let layer = Layer::activate(node_count, role, prev_count, &self.options, &mut self.rng)?;
        self.layers.push(layer);
        Ok(())
    }

    /// Insert a layer at 1-based `position` (`1..=len + 1`).
    ///
    /// The layer previously at `position` is re-initialized against the new
    /// layer's node count. On error the network is unchanged.
    pub fn insert_layer(&mut self, position: usize, node_count: usize, role: LayerRole) -> Result<()> {
        if position == 0 || position > self.layers.len() + 1 {
            return Err(DigitNetError::InvalidPosition {
                position,
                len: self.layers.len(),
            });
        }

        let index = position - 1;
        let prev_count = self.predecessor_count(index);
        let layer = Layer::activate(node_count, role, prev_count, &self.options, &mut self.rng)?;

        if let Some(follower) = self.layers.get_mut(index) {
            follower.reactivate(node_count, &self.options, &mut self.rng)?;
        }
        self.layers.insert(index, layer);

        log::debug!("inserted {:?} layer of {} nodes at position {}", role, node_count, position);
        Ok(())
    }

    /// Remove and return the layer at 1-based `position` (`1..=len`).
    ///
    /// The layer that moves into `position` is re-initialized against its new
    /// predecessor. On error the network is unchanged.
    pub fn delete_layer(&mut self, position: usize) -> Result<Layer> {
        if position == 0 || position > self.layers.len() {
            return Err(DigitNetError::InvalidPosition {
                position,
                len: self.layers.len(),
            });
        }

        let index = position - 1;
        let prev_count = self.predecessor_count(index);
        if let Some(follower) = self.layers.get_mut(index + 1) {
            follower.reactivate(prev_count, &self.options, &mut self.rng)?;
        }
        let removed = self.layers.remove(index);

        log::debug!("deleted layer at position {}, {} layers left", position, self.layers.len());
        Ok(removed)
    }

    /// The layer at 1-based `position`.
    pub fn layer(&self, position: usize) -> Result<&Layer> {
        if position == 0 {
            return Err(DigitNetError::InvalidPosition {
                position,
                len: self.layers.len(),
            });
        }
        self.layers.get(position - 1).ok_or(DigitNetError::InvalidPosition {
            position,
            len: self.layers.len(),
        })
    }

    pub(crate) fn layer_mut(&mut self, position: usize) -> Result<&mut Layer> {
        let len = self.layers.len();
        if position == 0 {
            return Err(DigitNetError::InvalidPosition { position, len });
        }
        self.layers
            .get_mut(position - 1)
            .ok_or(DigitNetError::InvalidPosition { position, len })
    }

    /// A fresh cursor over the layers.
    pub fn traverse(&self, direction: Direction) -> Traversal<'_> {
        Traversal {
            layers: self.layers.iter(),
            direction,
        }
    }

    /// Check that every layer's weights are shaped for its predecessor.
    ///
    /// Input layers and layers without a predecessor must own no weights;
    /// every other layer must own weights and a bias of the expected shape.
    pub fn check_structure(&self) -> Result<()> {
        let orientation = self.options.node_orientation;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.node_count() == 0 {
                return Err(DigitNetError::InvalidShape(format!("layer {} has no nodes", index + 1)));
            }

            let prev_count = self.predecessor_count(index);
            if layer.role() == LayerRole::Input || prev_count == 0 {
                if !layer.weights().is_zero() || !layer.bias().is_zero() {
                    return Err(DigitNetError::InvalidShape(format!(
                        "layer {} has no predecessor weights but owns {:?} and {:?}",
                        index + 1,
                        layer.weights().shape(),
                        layer.bias().shape()
                    )));
                }
                continue;
            }

            let expected_weights = orientation.weight_shape(layer.node_count(), prev_count);
            let expected_bias = orientation.vector_shape(layer.node_count());
            if layer.weights().shape() != expected_weights || layer.bias().shape() != expected_bias {
                return Err(DigitNetError::InvalidShape(format!(
                    "layer {} expects weights {:?} and bias {:?}, has {:?} and {:?}",
                    index + 1,
                    expected_weights,
                    expected_bias,
                    layer.weights().shape(),
                    layer.bias().shape()
                )));
            }
        }
        Ok(())
    }

    /// Release every layer and reset the options to their neutral default.
    pub fn clear(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.free();
        }
        self.layers.clear();
        self.options = NetworkOptions::default();
    }

    /// Save the network's layers and options to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&serialized)?;
        Ok(())
    }

    /// Load a network from a file written by [`Network::save`].
    ///
    /// The PRNG is re-seeded from the stored options.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = fs::File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let mut network: Network = deserialize(&buffer)?;
        network.options.validate()?;
        network.check_structure()?;
        network.rng = rng_for(&network.options);
        Ok(network)
    }
}
