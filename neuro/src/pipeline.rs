use crate::neuro::Renderer;
use crate::{data, render, uniforms::Uniforms};
use render::{
    Buffer, Context, Program, Uniform, UniformValue, VertexArrayObject, VertexBufferLayout,
};

use glow::HasContext;
use std::rc::Rc;

static NEURO_VERT_SHADER: &str = include_str!(concat!(env!("OUT_DIR"), "/shaders/neuro.vert"));
static NEURO_FRAG_SHADER: &str = include_str!(concat!(env!("OUT_DIR"), "/shaders/neuro.frag"));

pub const U_TIME: &str = "u_time";
pub const U_RATIO: &str = "u_ratio";
pub const U_POINTER_POSITION: &str = "u_pointer_position";
pub const U_SCROLL_PROGRESS: &str = "u_scroll_progress";

/// The neuro shader pair bound to a full-viewport quad.
pub struct Pipeline {
    context: Context,

    physical_width: u32,
    physical_height: u32,

    #[allow(unused)]
    plane_vertices: Buffer,
    plane: VertexArrayObject,

    draw_neuro_pass: Program,
}

impl Pipeline {
    pub fn new(
        context: &Context,
        physical_width: u32,
        physical_height: u32,
    ) -> Result<Self, render::Problem> {
        let draw_neuro_pass = Program::new(context, (NEURO_VERT_SHADER, NEURO_FRAG_SHADER))?;

        let plane_vertices = Buffer::from_f32(
            context,
            &data::PLANE_VERTICES,
            glow::ARRAY_BUFFER,
            glow::STATIC_DRAW,
        )?;

        let plane = VertexArrayObject::new(
            context,
            &draw_neuro_pass,
            &[(
                &plane_vertices,
                VertexBufferLayout {
                    name: "a_position",
                    size: 2,
                    type_: glow::FLOAT,
                    ..Default::default()
                },
            )],
        )?;

        unsafe {
            context.disable(glow::BLEND);
            context.disable(glow::DEPTH_TEST);
        }

        Ok(Self {
            context: Rc::clone(context),
            physical_width,
            physical_height,
            plane_vertices,
            plane,
            draw_neuro_pass,
        })
    }
}

impl Renderer for Pipeline {
    fn resize(&mut self, physical_width: u32, physical_height: u32) {
        self.physical_width = physical_width;
        self.physical_height = physical_height;
    }

    fn draw(&mut self, uniforms: &Uniforms) {
        unsafe {
            self.context.viewport(
                0,
                0,
                self.physical_width as i32,
                self.physical_height as i32,
            );
            self.context.clear_color(0.0, 0.0, 0.0, 0.0);
            self.context.clear(glow::COLOR_BUFFER_BIT);

            self.draw_neuro_pass.use_program();
            self.draw_neuro_pass.set_uniforms(&shader_uniforms(uniforms));
            self.plane.bind();

            self.context
                .draw_arrays(glow::TRIANGLES, 0, data::PLANE_VERTEX_COUNT);

            self.context.bind_vertex_array(None);
        }
    }
}

fn shader_uniforms(uniforms: &Uniforms) -> [Uniform; 4] {
    [
        Uniform {
            name: U_TIME,
            value: UniformValue::Float(uniforms.time),
        },
        Uniform {
            name: U_RATIO,
            value: UniformValue::Float(uniforms.ratio),
        },
        Uniform {
            name: U_POINTER_POSITION,
            value: UniformValue::Vec2(uniforms.pointer_position),
        },
        Uniform {
            name: U_SCROLL_PROGRESS,
            value: UniformValue::Float(uniforms.scroll_progress),
        },
    ]
}
