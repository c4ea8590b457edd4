use std::borrow::Cow;

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::SetupError;
use super::geometry::SceneKind;

/// Name of the vertex stage entry point every shader must export.
pub const VERTEX_ENTRY: &str = "vertex_main";
/// Name of the fragment stage entry point every shader must export.
pub const FRAGMENT_ENTRY: &str = "fragment_main";

/// A parsed and validated WGSL shader.
///
/// Parsing up front turns shader mistakes into [`SetupError`]s instead of
/// device validation panics during pipeline creation.
pub struct ShaderLibrary {
    label: String,
    source: Cow<'static, str>,
    module: naga::Module,
}

impl std::fmt::Debug for ShaderLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderLibrary")
            .field("label", &self.label)
            .field("entry_points", &self.module.entry_points.len())
            .finish()
    }
}

impl ShaderLibrary {
    /// Parses and validates `source`.
    pub fn from_wgsl(
        label: impl Into<String>,
        source: impl Into<Cow<'static, str>>,
    ) -> Result<Self, SetupError> {
        let label = label.into();
        let source = source.into();

        let module = wgsl::parse_str(&source).map_err(|err| SetupError::ShaderParse {
            label: label.clone(),
            message: err.emit_to_string(&source),
        })?;

        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|err| SetupError::ShaderValidation {
                label: label.clone(),
                message: err.into_inner().to_string(),
            })?;

        log::debug!(
            "shader `{label}` parsed: {} entry point(s)",
            module.entry_points.len()
        );

        Ok(Self { label, source, module })
    }

    /// The bundled shader for `scene`.
    pub fn builtin(scene: SceneKind) -> Result<Self, SetupError> {
        let source = match scene {
            SceneKind::Triangle => include_str!("shaders/triangle.wgsl"),
            SceneKind::Cube => include_str!("shaders/cube.wgsl"),
            SceneKind::TexturedCube => include_str!("shaders/textured_cube.wgsl"),
        };
        Self::from_wgsl(scene.label(), source)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolves the entry point `name`, which must belong to `stage`.
    pub fn entry_point(
        &self,
        name: &'static str,
        stage: naga::ShaderStage,
    ) -> Result<&naga::EntryPoint, SetupError> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage)
            .ok_or_else(|| SetupError::MissingEntryPoint {
                label: self.label.clone(),
                name,
                stage,
            })
    }

    /// Checks the vertex entry point's inputs against `layout`.
    ///
    /// Every `@location` input must be fed by a float attribute of the layout,
    /// and every attribute must lie inside the stride.
    pub fn check_vertex_inputs(
        &self,
        layout: &wgpu::VertexBufferLayout<'_>,
    ) -> Result<(), SetupError> {
        let entry = self.entry_point(VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
        let mismatch = |reason: String| SetupError::VertexLayout {
            label: self.label.clone(),
            reason,
        };

        for attr in layout.attributes {
            if attr.offset + attr.format.size() > layout.array_stride {
                return Err(mismatch(format!(
                    "attribute {} ({:?} at offset {}) exceeds stride {}",
                    attr.shader_location, attr.format, attr.offset, layout.array_stride
                )));
            }
        }

        for (location, ty) in self.vertex_locations(entry) {
            let Some(attr) = layout
                .attributes
                .iter()
                .find(|a| a.shader_location == location)
            else {
                return Err(mismatch(format!("no attribute provides location {location}")));
            };

            let shader_float = matches!(
                scalar_kind(&self.module.types[ty].inner),
                Some(naga::ScalarKind::Float)
            );
            if shader_float != is_float_format(attr.format) {
                return Err(mismatch(format!(
                    "location {location} expects {:?}, layout provides {:?}",
                    self.module.types[ty].inner, attr.format
                )));
            }
        }

        Ok(())
    }

    /// `(location, type)` of every located input, including struct members.
    fn vertex_locations(&self, entry: &naga::EntryPoint) -> Vec<(u32, naga::Handle<naga::Type>)> {
        let mut out = Vec::new();
        for arg in &entry.function.arguments {
            match arg.binding {
                Some(naga::Binding::Location { location, .. }) => out.push((location, arg.ty)),
                Some(naga::Binding::BuiltIn(_)) => {}
                None => {
                    if let naga::TypeInner::Struct { members, .. } = &self.module.types[arg.ty].inner {
                        for member in members {
                            if let Some(naga::Binding::Location { location, .. }) = member.binding {
                                out.push((location, member.ty));
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

fn scalar_kind(inner: &naga::TypeInner) -> Option<naga::ScalarKind> {
    match *inner {
        naga::TypeInner::Scalar(scalar) => Some(scalar.kind),
        naga::TypeInner::Vector { scalar, .. } => Some(scalar.kind),
        _ => None,
    }
}

fn is_float_format(format: wgpu::VertexFormat) -> bool {
    use wgpu::VertexFormat as F;
    !matches!(
        format,
        F::Uint8x2
            | F::Uint8x4
            | F::Sint8x2
            | F::Sint8x4
            | F::Uint16x2
            | F::Uint16x4
            | F::Sint16x2
            | F::Sint16x4
            | F::Uint32
            | F::Uint32x2
            | F::Uint32x3
            | F::Uint32x4
            | F::Sint32
            | F::Sint32x2
            | F::Sint32x3
            | F::Sint32x4
    )
}
