/// A macro to create a new `Network` from options and `(nodes, Role)` pairs.
///
/// # Examples
///
/// ```
/// use digitnet::config::NetworkOptions;
/// use digitnet::layers::DistributionStrategy;
/// use digitnet::create_network;
///
/// let options = NetworkOptions::new(DistributionStrategy::HeXavier, 1.0).with_seed(7);
/// let network = create_network!(options, (784, Input), (30, Hidden), (10, Output)).unwrap();
/// assert_eq!(network.len(), 3);
/// ```
///
/// This expands to `Network::new` with one `LayerSpec` per pair, so the result is a
/// `Result<Network>`: the Input layer owns no weights, the Hidden layer gets `30x784`
/// weights and the Output layer `10x30`.
#[macro_export]
macro_rules! create_network {
    ($options:expr $(, ($nodes:expr, $role:ident) )* $(,)? ) => {
        $crate::network::Network::new(
            $options,
            &[$( $crate::layers::LayerSpec::new($nodes, $crate::layers::LayerRole::$role) ),*],
        )
    };
}
