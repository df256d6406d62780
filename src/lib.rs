//! # Rusty-trees
//!
//! `rusty-trees` induces decision trees from tables of categorical examples and
//! measures how well they classify unseen rows over repeated random train/test splits.
//! Two induction algorithms are provided: ID3, which grows multiway trees by information
//! gain and predicts through the rules read off its leaves, and CART, which grows binary
//! trees of equality tests by Gini impurity reduction.
//!
//! ## Getting Started
//!
//! To use `rusty-trees`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-trees = "*"
//! ```
//!
//! ## Example Usage
//!
//! As a quick example, here's how you can induce an ID3 tree on a tiny dataset and
//! read its rules:
//!
//! ```rust
//! use rusty_trees::data::dataset::{Dataset, Example};
//! use rusty_trees::trees::classifier::Classifier;
//! use rusty_trees::trees::id3::Id3Classifier;
//!
//! let dataset = Dataset::from_records(
//!     &["genre", "revenue"],
//!     "revenue",
//!     &[],
//!     &[
//!         vec!["Action", "1"],
//!         vec!["Action", "1"],
//!         vec!["Drama", "0"],
//!     ],
//! )
//! .unwrap();
//!
//! let mut model = Id3Classifier::new();
//! model.fit(&dataset).unwrap();
//!
//! assert_eq!(model.rules().len(), 2);
//! assert_eq!(model.rules()[0].to_string(), "genre = Action => 1");
//!
//! let query = Example::new(vec!["Action".to_string(), String::new()]);
//! assert_eq!(model.predict_one(&query).unwrap().as_deref(), Some("1"));
//! ```

/// Dataset and data manipulation utilities
pub mod data;
/// Errors
pub mod error;
/// Repeated train/test evaluation
pub mod evaluation;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use error::TreeError;
