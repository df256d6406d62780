/// Binary trees over equality tests, grown with Gini impurity
pub mod cart;
/// Interface shared by the tree classifiers
pub mod classifier;
/// Class frequency tallies, entropy and Gini impurity
pub mod counts;
/// Multiway trees grown with information gain
pub mod id3;
/// Multiway tree nodes
pub mod node;
/// Tree parameters
pub mod params;
/// Rule extraction from multiway trees
pub mod rules;
