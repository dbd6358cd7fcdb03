use crate::errors::AgenrResult;

/// Injected embedding capability. Implementors turn text into a fixed-width
/// dense vector; all vectors produced for one database must agree in
/// dimension.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, texts: &[String]) -> AgenrResult<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> AgenrResult<Vec<f32>> {
        Ok(self.embed(&[text.to_string()])?.remove(0))
    }
}
