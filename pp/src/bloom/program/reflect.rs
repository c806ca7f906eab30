//! Resolves named shader parameters to uniform buffer offsets once, at setup.

use naga::{AddressSpace, ArraySize, Module, Scalar, StructMember, TypeInner, VectorSize};
use tracing::debug;

use crate::{BloomError, ProgramKind};

/// `@binding` slots of group 0 shared by every bloom program.
pub const INPUT_SAMPLER_BINDING: u32 = 0;
pub const INPUT_TEXTURE_BINDING: u32 = 1;
pub const PARAMS_BINDING: u32 = 2;
pub const BASE_SAMPLER_BINDING: u32 = 3;
pub const BASE_TEXTURE_BINDING: u32 = 4;

/// A parsed program and its uniform parameter block.
pub struct ShaderReflection {
    program: ProgramKind,
    module: Module,
    /// Byte size of the uniform block
    params_size: u32,
    params_members: Vec<StructMember>,
}

/// An `array<vec4<f32>, N>` inside the uniform block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Vec4Array {
    pub offset: u32,
    pub len: u32,
    pub stride: u32,
}

impl ShaderReflection {
    /// Parses `source` and finds the uniform block at `PARAMS_BINDING`.
    pub fn parse(program: ProgramKind, source: &str) -> Result<Self, BloomError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|err| BloomError::ShaderParse {
            program,
            message: err.emit_to_string(source),
        })?;

        let params = module
            .global_variables
            .iter()
            .map(|(_, var)| var)
            .find(|var| var.space == AddressSpace::Uniform)
            .ok_or(BloomError::MissingShaderParameter {
                program,
                parameter: "params",
            })?;

        match params.binding.as_ref() {
            Some(binding) if binding.group == 0 && binding.binding == PARAMS_BINDING => {}
            other => {
                return Err(BloomError::ShaderParameterMismatch {
                    program,
                    parameter: "params",
                    reason: format!(
                        "uniform block must be @group(0) @binding({}), found {:?}",
                        PARAMS_BINDING, other
                    ),
                })
            }
        }

        let (params_size, params_members) = match &module.types[params.ty].inner {
            TypeInner::Struct { members, span } => (*span, members.clone()),
            other => {
                return Err(BloomError::ShaderParameterMismatch {
                    program,
                    parameter: "params",
                    reason: format!("expected a struct, found {:?}", other),
                })
            }
        };
        debug!(
            "Reflected {} params: {} bytes, members {:?}",
            program,
            params_size,
            params_members
                .iter()
                .map(|m| (m.name.as_deref().unwrap_or("_"), m.offset))
                .collect::<Vec<_>>()
        );

        Ok(Self {
            program,
            module,
            params_size,
            params_members,
        })
    }

    pub fn params_size(&self) -> u32 {
        self.params_size
    }

    fn member(&self, name: &'static str) -> Result<&StructMember, BloomError> {
        self.params_members
            .iter()
            .find(|m| m.name.as_deref() == Some(name))
            .ok_or(BloomError::MissingShaderParameter {
                program: self.program,
                parameter: name,
            })
    }

    fn mismatch(&self, parameter: &'static str, reason: String) -> BloomError {
        BloomError::ShaderParameterMismatch {
            program: self.program,
            parameter,
            reason,
        }
    }

    /// Offset of an `f32` member.
    pub fn f32_offset(&self, name: &'static str) -> Result<u32, BloomError> {
        let member = self.member(name)?;
        match self.module.types[member.ty].inner {
            TypeInner::Scalar(Scalar::F32) => Ok(member.offset),
            ref other => Err(self.mismatch(name, format!("expected f32, found {:?}", other))),
        }
    }

    /// Layout of an `array<vec4<f32>, N>` member.
    pub fn vec4_array(&self, name: &'static str) -> Result<Vec4Array, BloomError> {
        let member = self.member(name)?;
        let (base, size, stride) = match self.module.types[member.ty].inner {
            TypeInner::Array { base, size, stride } => (base, size, stride),
            ref other => {
                return Err(self.mismatch(name, format!("expected an array, found {:?}", other)))
            }
        };
        let len = match size {
            ArraySize::Constant(len) => len.get(),
            ArraySize::Dynamic => {
                return Err(self.mismatch(name, "array must have a fixed length".to_string()))
            }
        };
        match self.module.types[base].inner {
            TypeInner::Vector {
                size: VectorSize::Quad,
                scalar: Scalar::F32,
            } => Ok(Vec4Array {
                offset: member.offset,
                len,
                stride,
            }),
            ref other => Err(self.mismatch(
                name,
                format!("expected vec4<f32> elements, found {:?}", other),
            )),
        }
    }

    /// Checks that a `texture_2d` global called `name` sits at `binding`.
    pub fn texture_at(&self, name: &'static str, binding: u32) -> Result<(), BloomError> {
        let var = self
            .module
            .global_variables
            .iter()
            .map(|(_, var)| var)
            .find(|var| var.name.as_deref() == Some(name))
            .ok_or(BloomError::MissingShaderParameter {
                program: self.program,
                parameter: name,
            })?;
        if !matches!(self.module.types[var.ty].inner, TypeInner::Image { .. }) {
            return Err(self.mismatch(name, "expected a texture".to_string()));
        }
        match var.binding.as_ref() {
            Some(b) if b.group == 0 && b.binding == binding => Ok(()),
            other => Err(self.mismatch(
                name,
                format!("expected @group(0) @binding({}), found {:?}", binding, other),
            )),
        }
    }
}
