//! Normalized embedding vectors for semantic similarity

#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
	/// Create normalized embedding from raw data
	pub fn new(data: Vec<f32>) -> Self {
		Self(normalize(&data))
	}

	/// Create from pre-normalized data (cache deserialization)
	pub fn raw(data: Vec<f32>) -> Self {
		Self(data)
	}

	/// Get raw vector
	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	/// Cosine similarity, assuming both sides are unit-normalized.
	/// Mismatched dimensions are a corpus-construction bug, not a runtime case.
	pub fn similarity(&self, other: &Self) -> f32 {
		debug_assert_eq!(self.0.len(), other.0.len());
		self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
	}
}

fn normalize(v: &[f32]) -> Vec<f32> {
	let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
	if norm > 0.0 {
		v.iter().map(|x| x / norm).collect()
	} else {
		v.to_vec()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn l2(v: &[f32]) -> f32 {
		v.iter().map(|x| x * x).sum::<f32>().sqrt()
	}

	#[test]
	fn new_produces_unit_norm() {
		let e = Embedding::new(vec![3.0, 4.0]);
		assert!((l2(e.as_slice()) - 1.0).abs() < 1e-5);
		assert!((e.as_slice()[0] - 0.6).abs() < 1e-6);
		assert!((e.as_slice()[1] - 0.8).abs() < 1e-6);
	}

	#[test]
	fn zero_vector_stays_zero() {
		let e = Embedding::new(vec![0.0, 0.0, 0.0]);
		assert_eq!(e.as_slice(), &[0.0, 0.0, 0.0]);
	}

	#[test]
	fn similarity_is_symmetric() {
		let a = Embedding::new(vec![1.0, 0.0]);
		let b = Embedding::new(vec![0.8, 0.6]);
		assert_eq!(a.similarity(&b), b.similarity(&a));
	}

	#[test]
	fn self_similarity_is_one() {
		let a = Embedding::new(vec![0.3, -0.2, 0.9]);
		assert!((a.similarity(&a) - 1.0).abs() < 1e-5);
	}
}
