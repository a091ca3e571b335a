use glow::HasContext;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use thiserror::Error;

pub type Context = Rc<glow::Context>;
type GlDataType = u32;
type Result<T> = std::result::Result<T, Problem>;

#[derive(Error, Debug)]
pub enum Problem {
    #[error("Cannot create buffer")]
    CannotCreateBuffer,

    #[error("Cannot create vertex array")]
    CannotCreateVertexArray,

    #[error("{}", match .0 {
        Some(log) => format!("Cannot create shader: {}", log),
        None => "Cannot create shader".to_string(),
    })]
    CannotCreateShader(Option<String>),

    #[error("Cannot create program")]
    CannotCreateProgram,

    #[error("Cannot link program: {0}")]
    CannotLinkProgram(String),

    #[error("Vertex attribute type is not supported")]
    CannotBindUnsupportedVertexType,
}

pub struct Buffer {
    context: Context,
    pub id: glow::Buffer,
    pub size: usize,
    pub type_: GlDataType,
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.context.delete_buffer(self.id);
        }
    }
}

impl Buffer {
    pub fn from_bytes(
        context: &Context,
        data: &[u8],
        buffer_type: GlDataType,
        usage: GlDataType,
    ) -> Result<Self> {
        let buffer = unsafe {
            let buffer = context
                .create_buffer()
                .map_err(|_| Problem::CannotCreateBuffer)?;

            context.bind_buffer(buffer_type, Some(buffer));
            context.buffer_data_u8_slice(buffer_type, data, usage);
            context.bind_buffer(buffer_type, None);

            buffer
        };

        Ok(Self {
            context: Rc::clone(context),
            id: buffer,
            size: data.len(),
            type_: buffer_type,
        })
    }

    pub fn from_f32(
        context: &Context,
        data: &[f32],
        buffer_type: GlDataType,
        usage: GlDataType,
    ) -> Result<Self> {
        Self::from_bytes(context, bytemuck::cast_slice(data), buffer_type, usage)
    }
}

pub struct Program {
    context: Context,
    pub program: glow::Program,
    attributes: FxHashMap<String, u32>,
    uniforms: FxHashMap<String, glow::UniformLocation>,
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe {
            self.context.delete_program(self.program);
        }
    }
}

impl Program {
    /// Compile and link a `(vertex, fragment)` shader pair, then cache the
    /// locations of every active attribute and uniform.
    pub fn new(context: &Context, shaders: (&str, &str)) -> Result<Self> {
        let vertex_shader = compile_shader(context, glow::VERTEX_SHADER, shaders.0)?;
        let fragment_shader = match compile_shader(context, glow::FRAGMENT_SHADER, shaders.1) {
            Ok(shader) => shader,
            Err(problem) => {
                unsafe { context.delete_shader(vertex_shader) };
                return Err(problem);
            }
        };

        let program = unsafe {
            let program = context
                .create_program()
                .map_err(|_| Problem::CannotCreateProgram)?;
            context.attach_shader(program, vertex_shader);
            context.attach_shader(program, fragment_shader);
            context.link_program(program);

            let linked = context.get_program_link_status(program);

            // The shaders are no longer needed once the program is linked.
            context.detach_shader(program, vertex_shader);
            context.detach_shader(program, fragment_shader);
            context.delete_shader(vertex_shader);
            context.delete_shader(fragment_shader);

            if !linked {
                let log = context.get_program_info_log(program);
                context.delete_program(program);
                return Err(Problem::CannotLinkProgram(log));
            }

            program
        };

        let mut attributes = FxHashMap::default();
        let mut uniforms = FxHashMap::default();
        unsafe {
            for index in 0..context.get_active_attributes(program) {
                if let Some(info) = context.get_active_attribute(program, index) {
                    if let Some(location) = context.get_attrib_location(program, &info.name) {
                        attributes.insert(info.name, location);
                    }
                }
            }

            for index in 0..context.get_active_uniforms(program) {
                if let Some(info) = context.get_active_uniform(program, index) {
                    if let Some(location) = context.get_uniform_location(program, &info.name) {
                        uniforms.insert(info.name, location);
                    }
                }
            }
        }

        log::debug!(
            "Linked program with {} attribute(s) and {} uniform(s)",
            attributes.len(),
            uniforms.len()
        );

        Ok(Program {
            context: Rc::clone(context),
            program,
            attributes,
            uniforms,
        })
    }

    pub fn use_program(&self) {
        unsafe {
            self.context.use_program(Some(self.program));
        }
    }

    /// Expects the program to be in use.
    pub fn set_uniforms(&self, uniforms: &[Uniform]) {
        for uniform in uniforms.iter() {
            self.set_uniform(uniform);
        }
    }

    /// Expects the program to be in use. Uniforms the compiler optimised away
    /// are skipped.
    pub fn set_uniform(&self, uniform: &Uniform) {
        let location = self.get_uniform_location(uniform.name);

        unsafe {
            match uniform.value {
                UniformValue::Float(value) => self.context.uniform_1_f32(location, value),
                UniformValue::Vec2([x, y]) => self.context.uniform_2_f32(location, x, y),
            }
        }
    }

    pub fn get_attrib_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    pub fn get_uniform_location(&self, name: &str) -> Option<&glow::UniformLocation> {
        self.uniforms.get(name)
    }
}

pub struct Uniform {
    pub name: &'static str,
    pub value: UniformValue,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
}

pub fn compile_shader(context: &Context, shader_type: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = context
            .create_shader(shader_type)
            .map_err(|_| Problem::CannotCreateShader(None))?;
        context.shader_source(shader, source);
        context.compile_shader(shader);

        if context.get_shader_compile_status(shader) {
            Ok(shader)
        } else {
            let log = context.get_shader_info_log(shader);
            context.delete_shader(shader);
            Err(Problem::CannotCreateShader(Some(log)))
        }
    }
}

#[derive(Default)]
pub struct VertexBufferLayout {
    pub name: &'static str,
    pub size: u32,
    pub type_: GlDataType,
    pub stride: u32,
    pub offset: u32,
}

pub struct VertexArrayObject {
    context: Context,
    pub id: glow::VertexArray,
}

impl Drop for VertexArrayObject {
    fn drop(&mut self) {
        unsafe {
            self.context.delete_vertex_array(self.id);
        }
    }
}

impl VertexArrayObject {
    pub fn new(
        context: &Context,
        program: &Program,
        vertices: &[(&Buffer, VertexBufferLayout)],
    ) -> Result<Self> {
        let id = unsafe {
            context
                .create_vertex_array()
                .map_err(|_| Problem::CannotCreateVertexArray)?
        };
        let vao = Self {
            context: Rc::clone(context),
            id,
        };

        unsafe {
            context.bind_vertex_array(Some(vao.id));

            for (buffer, layout) in vertices.iter() {
                bind_attributes(context, program, buffer, layout)?;
            }

            context.bind_vertex_array(None);
        }

        Ok(vao)
    }

    pub fn bind(&self) {
        unsafe {
            self.context.bind_vertex_array(Some(self.id));
        }
    }
}

pub fn bind_attributes(
    context: &Context,
    program: &Program,
    buffer: &Buffer,
    buffer_layout: &VertexBufferLayout,
) -> Result<()> {
    unsafe {
        context.bind_buffer(glow::ARRAY_BUFFER, Some(buffer.id));

        if let Some(location) = program.get_attrib_location(buffer_layout.name) {
            context.enable_vertex_attrib_array(location);

            match buffer_layout.type_ {
                glow::FLOAT => context.vertex_attrib_pointer_f32(
                    location,
                    buffer_layout.size as i32,
                    buffer_layout.type_,
                    false,
                    buffer_layout.stride as i32,
                    buffer_layout.offset as i32,
                ),
                _ => {
                    context.bind_buffer(glow::ARRAY_BUFFER, None);
                    return Err(Problem::CannotBindUnsupportedVertexType);
                }
            };
        } else {
            log::warn!("Attribute `{}` is not used by the program", buffer_layout.name);
        }

        context.bind_buffer(glow::ARRAY_BUFFER, None);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_problem_includes_the_info_log() {
        let problem = Problem::CannotCreateShader(Some("0:12: syntax error".to_string()));
        assert_eq!(problem.to_string(), "Cannot create shader: 0:12: syntax error");
        assert_eq!(
            Problem::CannotCreateShader(None).to_string(),
            "Cannot create shader"
        );
    }

    #[test]
    fn link_problem_includes_the_info_log() {
        let problem = Problem::CannotLinkProgram("missing main".to_string());
        assert_eq!(problem.to_string(), "Cannot link program: missing main");
    }
}
