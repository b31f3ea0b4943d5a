use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
};

/// Anything the training loop can treat as a sequence classifier.
///
/// The loop only ever needs logits; parameter updates go through
/// burn's `Optimizer`, never through this trait.
pub trait Classifier<B: Backend> {
    /// inputs: [batch, seq_len] token ids → logits: [batch, num_classes]
    fn forward(&self, inputs: Tensor<B, 2, Int>) -> Tensor<B, 2>;

    /// Mean cross-entropy of the logits against integer class labels.
    fn forward_loss(
        &self,
        inputs: Tensor<B, 2, Int>,
        labels: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(inputs);
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LstmClassifierConfig {
    /// Embedding rows; must exceed the largest vocabulary id
    pub input_dim:  usize,
    pub emb_dim:    usize,
    pub hid_dim:    usize,
    pub output_dim: usize,
    pub num_layers: usize,
    pub dropout:    f64,
}

impl LstmClassifierConfig {
    /// # Panics
    /// Panics if `num_layers` is 0; the head reads the top LSTM layer.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmClassifier<B> {
        assert!(self.num_layers > 0, "an LSTM classifier needs at least one layer");
        let embedding = EmbeddingConfig::new(self.input_dim, self.emb_dim).init(device);
        let layers: Vec<Lstm<B>> = (0..self.num_layers)
            .map(|i| {
                let d_input = if i == 0 { self.emb_dim } else { self.hid_dim };
                LstmConfig::new(d_input, self.hid_dim, true).init(device)
            })
            .collect();
        let dropout = DropoutConfig::new(self.dropout).init();
        let output  = LinearConfig::new(self.hid_dim, self.output_dim).init(device);
        LstmClassifier { embedding, layers, dropout, output }
    }
}

#[derive(Module, Debug)]
pub struct LstmClassifier<B: Backend> {
    pub embedding: Embedding<B>,
    pub layers:    Vec<Lstm<B>>,
    pub dropout:   Dropout,
    pub output:    Linear<B>,
}

impl<B: Backend> Classifier<B> for LstmClassifier<B> {
    fn forward(&self, inputs: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let mut x = self.embedding.forward(inputs); // [batch, seq_len, emb_dim]

        // Dropout sits between stacked layers, not after the last one.
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                x = self.dropout.forward(x);
            }
            let (out, _state) = layer.forward(x, None);
            x = out;
        }

        // The output at the last time step is the top layer's final hidden state.
        let [batch_size, seq_len, hid_dim] = x.dims();
        let features = x
            .slice([0..batch_size, seq_len - 1..seq_len, 0..hid_dim])
            .reshape([batch_size, hid_dim]);

        self.output.forward(self.dropout.forward(features))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_logit_shape() {
        let device = Default::default();
        let model: LstmClassifier<TestBackend> =
            LstmClassifierConfig::new(10, 8, 6, 5, 2, 0.0).init(&device);

        let inputs = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2, 3, 4, 5, 6, 7], &device)
            .reshape([2, 4]);
        let logits = model.forward(inputs);
        assert_eq!(logits.dims(), [2, 5]);
    }

    #[test]
    fn test_layers_are_stacked() {
        let device = Default::default();
        let model: LstmClassifier<TestBackend> =
            LstmClassifierConfig::new(10, 8, 6, 3, 3, 0.5).init(&device);
        assert_eq!(model.layers.len(), 3);
    }

    #[test]
    fn test_loss_is_positive_scalar() {
        let device = Default::default();
        let model: LstmClassifier<TestBackend> =
            LstmClassifierConfig::new(10, 4, 4, 3, 1, 0.0).init(&device);

        let inputs = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 3, 4, 5, 6], &device)
            .reshape([2, 3]);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 2], &device);
        let (loss, logits) = model.forward_loss(inputs, labels);

        assert_eq!(logits.dims(), [2, 3]);
        let loss: f64 = loss.into_scalar().elem::<f64>();
        assert!(loss.is_finite() && loss > 0.0);
    }
}
