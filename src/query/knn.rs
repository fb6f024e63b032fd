//! K-nearest-neighbors predicate builder for vector fields.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Builder for a knn predicate on one vector field.
#[derive(Debug, Clone)]
pub struct KnnPredicateBuilder {
    field: FieldDescriptor,
    k: usize,
    vector: Option<Vec<f32>>,
    filter: Option<SearchPredicate>,
    required_minimum_similarity: Option<f32>,
    score: ScoreOptions,
}

impl KnnPredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        KnnPredicateBuilder {
            field,
            k: 0,
            vector: None,
            filter: None,
            required_minimum_similarity: None,
            score: ScoreOptions::default(),
        }
    }

    /// Set the number of neighbors to find.
    pub fn k(&mut self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(PilumError::invalid_argument(
                "the number of nearest neighbors must be strictly positive",
            ));
        }
        self.k = k;
        Ok(())
    }

    /// Set the vector to search near.
    pub fn vector(&mut self, vector: Vec<f32>) -> Result<()> {
        if let Some(dimension) = self.field.dimension() {
            if vector.len() != dimension {
                return Err(PilumError::invalid_argument(format!(
                    "vector for field '{}' has {} dimensions, expected {dimension}",
                    self.field.path(),
                    vector.len()
                )));
            }
        }
        self.vector = Some(vector);
        Ok(())
    }

    /// Restrict candidates to documents matching a filter.
    pub fn filter(&mut self, filter: SearchPredicate) {
        self.filter = Some(filter);
    }

    /// Drop neighbors whose similarity is below the threshold.
    pub fn required_minimum_similarity(&mut self, similarity: f32) {
        self.required_minimum_similarity = Some(similarity);
    }
}

impl SearchPredicateBuilder for KnnPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        if self.k == 0 {
            return Err(PilumError::invalid_argument(
                "the number of nearest neighbors must be strictly positive",
            ));
        }
        let vector = self.vector.ok_or_else(|| {
            PilumError::invalid_argument(format!("no vector for field '{}'", self.field.path()))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Knn {
                field: self.field.path().to_string(),
                k: self.k,
                vector,
                filter: self.filter.map(Box::new),
                required_minimum_similarity: self.required_minimum_similarity,
            },
            self.score,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::FieldKind;

    fn embedding_field() -> FieldDescriptor {
        FieldDescriptor::new("embedding", FieldKind::Vector).with_dimension(3)
    }

    #[test]
    fn test_knn_build() {
        let mut builder = KnnPredicateBuilder::new(embedding_field());
        builder.k(5).unwrap();
        builder.vector(vec![0.1, 0.2, 0.3]).unwrap();

        let predicate = builder.build().unwrap();
        assert_eq!(
            predicate.to_string(),
            "Knn(embedding, k=5, vector=[0.1, 0.2, 0.3])"
        );
    }

    #[test]
    fn test_knn_validation() {
        let mut builder = KnnPredicateBuilder::new(embedding_field());
        assert!(builder.k(0).is_err());
        assert!(builder.vector(vec![1.0]).is_err());
    }
}
