use thiserror::Error;

/// Unrecoverable failure while building the renderer.
///
/// Returned from constructors so the caller can report it and stop, instead of
/// running a view that never draws.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to parse shader `{label}`:\n{message}")]
    ShaderParse { label: String, message: String },

    #[error("shader `{label}` failed validation: {message}")]
    ShaderValidation { label: String, message: String },

    #[error("shader `{label}` has no {stage:?} entry point named `{name}`")]
    MissingEntryPoint {
        label: String,
        name: &'static str,
        stage: naga::ShaderStage,
    },

    #[error("vertex layout does not match shader `{label}`: {reason}")]
    VertexLayout { label: String, reason: String },

    #[error("pipeline for shader `{label}` failed validation: {message}")]
    PipelineValidation { label: String, message: String },

    #[error("scene requires a texture but none was provided")]
    MissingTexture,

    #[error("failed to decode texture image")]
    TextureDecode(#[from] image::ImageError),

    #[error("texture image is empty ({width}x{height})")]
    EmptyTexture { width: u32, height: u32 },

    #[error("texture is {width}x{height}, device limit is {limit}")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },
}
