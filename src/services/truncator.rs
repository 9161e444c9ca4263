use anyhow::Context;
use tiktoken_rs::{get_bpe_from_model, CoreBPE};

/// Cuts text down to the token budget left for the prompt once the model's
/// answer has been reserved.
pub struct TextTruncator {
    bpe: CoreBPE,
    token_limit: usize,
}

impl TextTruncator {
    pub fn for_model(
        model: &str,
        max_context_tokens: usize,
        reserved_output_tokens: usize,
    ) -> anyhow::Result<Self> {
        let bpe = get_bpe_from_model(model)
            .with_context(|| format!("No tokenizer available for model {}", model))?;

        Ok(TextTruncator {
            bpe,
            token_limit: max_context_tokens.saturating_sub(reserved_output_tokens),
        })
    }

    #[cfg(test)]
    pub(crate) fn token_limit(&self) -> usize {
        self.token_limit
    }

    #[cfg(test)]
    pub(crate) fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    pub fn truncate(&self, text: &str) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= self.token_limit {
            return text.to_string();
        }

        log::info!(
            "Truncating page text from {} to {} tokens",
            tokens.len(),
            self.token_limit
        );

        // A cut can land inside a multi-byte character, back off until it decodes
        let mut end = self.token_limit;
        while end > 0 {
            if let Ok(prefix) = self.bpe.decode(tokens[..end].to_vec()) {
                return prefix;
            }
            end -= 1;
        }

        String::new()
    }
}
