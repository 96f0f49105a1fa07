pub mod catalog;
pub mod recommendations;
pub mod similarity;
pub mod stopwords;
pub mod vectorizer;

pub use catalog::MovieCatalog;
pub use recommendations::{MatrixSource, Recommender};
pub use similarity::SimilarityMatrix;
