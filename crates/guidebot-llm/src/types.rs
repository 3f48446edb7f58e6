/// Per-call generation knobs. `None` leaves the provider default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationConfig {
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl GenerationConfig {
    pub fn new(max_output_tokens: u32, temperature: f32) -> Self {
        Self { max_output_tokens: Some(max_output_tokens), temperature: Some(temperature) }
    }
}
