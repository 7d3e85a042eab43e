//! Document retrieval adapters

pub mod wikipedia;

pub use wikipedia::WikipediaRetriever;
