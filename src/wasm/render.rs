use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::{EngineError, ShaderStage};
use crate::frame::FrameUniforms;
use crate::interaction::InteractionSnapshot;
use crate::layers::LayerRole;
use crate::params::ParameterSet;
use crate::shader::{self, UniformSlot, UNIFORM_NAMES};

/// One canvas, one WebGL2 context, one program. Shares nothing with its
/// sibling layers.
pub struct LayerRenderer {
    role: LayerRole,
    params: ParameterSet,
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    uniforms: Vec<Option<WebGlUniformLocation>>,
    frames: u64,
}

impl LayerRenderer {
    pub fn new(
        role: LayerRole,
        canvas: HtmlCanvasElement,
        params: ParameterSet,
    ) -> Result<Self, EngineError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
            .ok_or(EngineError::GpuUnavailable { role })?;

        let program = link_program(&gl)?;
        let (vao, buffer) = match upload_quad(&gl, &program) {
            Ok(handles) => handles,
            Err(err) => {
                gl.delete_program(Some(&program));
                return Err(err);
            }
        };
        let uniforms = UNIFORM_NAMES
            .iter()
            .map(|name| gl.get_uniform_location(&program, name))
            .collect();

        Ok(Self {
            role,
            params,
            canvas,
            gl,
            program,
            vao,
            buffer,
            uniforms,
            frames: 0,
        })
    }

    pub fn role(&self) -> LayerRole {
        self.role
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Match the backing store to the canvas' layout size.
    fn resize(&self, device_pixels: bool) -> (u32, u32) {
        let scale = if device_pixels {
            web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
        } else {
            1.0
        };
        let w = (self.canvas.client_width() as f64 * scale) as u32;
        let h = (self.canvas.client_height() as f64 * scale) as u32;
        if self.canvas.width() != w {
            self.canvas.set_width(w);
        }
        if self.canvas.height() != h {
            self.canvas.set_height(h);
        }
        self.gl.viewport(0, 0, w as i32, h as i32);
        (w, h)
    }

    /// Resize, upload this frame's uniforms and draw the quad.
    pub fn render(
        &mut self,
        interaction: &InteractionSnapshot,
        elapsed_ms: f64,
        device_pixels: bool,
    ) -> FrameUniforms {
        let (w, h) = self.resize(device_pixels);
        let frame = FrameUniforms::new(&self.params, interaction, elapsed_ms, w, h);

        self.gl.use_program(Some(&self.program));
        self.gl.bind_vertex_array(Some(&self.vao));
        self.upload(&frame);
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        self.gl.bind_vertex_array(None);

        if self.frames == 0 {
            log::debug!(
                "{} layer first frame: {}x{} geometry={} density={} speed={} intensity={} hue={}",
                self.role,
                w,
                h,
                self.params.geometry().name(),
                self.params.density,
                self.params.speed,
                self.params.intensity,
                self.params.hue
            );
        }
        self.frames += 1;
        frame
    }

    fn location(&self, slot: UniformSlot) -> Option<&WebGlUniformLocation> {
        self.uniforms[slot as usize].as_ref()
    }

    fn upload(&self, frame: &FrameUniforms) {
        let gl = &self.gl;
        gl.uniform2f(
            self.location(UniformSlot::Resolution),
            frame.resolution.x,
            frame.resolution.y,
        );
        gl.uniform1f(self.location(UniformSlot::Time), frame.time_ms);
        gl.uniform2f(self.location(UniformSlot::Pointer), frame.pointer.x, frame.pointer.y);
        gl.uniform1f(self.location(UniformSlot::GeometryType), frame.geometry_type);
        gl.uniform1f(self.location(UniformSlot::Density), frame.density);
        gl.uniform1f(self.location(UniformSlot::Speed), frame.speed);
        gl.uniform1f(self.location(UniformSlot::Intensity), frame.intensity);
        gl.uniform1f(self.location(UniformSlot::Hue), frame.hue);
        gl.uniform1f(self.location(UniformSlot::Chaos), frame.chaos);
        gl.uniform1f(self.location(UniformSlot::Morph), frame.morph);
        gl.uniform1f(self.location(UniformSlot::Interaction), frame.interaction);
    }

    /// RGBA8 of the current drawing buffer, bottom row first. Only valid in
    /// the same task as [`render`](Self::render) unless the context preserves
    /// its drawing buffer.
    pub fn read_pixels(&self) -> Result<Vec<u8>, EngineError> {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let mut pixels = vec![0u8; w as usize * h as usize * 4];
        self.gl.read_pixels_with_opt_u8_array(
            0,
            0,
            w as i32,
            h as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            Some(&mut pixels),
        )?;
        Ok(pixels)
    }

    /// Delete the program, buffer and vertex array.
    pub fn release(&self) {
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_buffer(Some(&self.buffer));
        self.gl.delete_program(Some(&self.program));
        log::debug!("{} layer released after {} frames", self.role, self.frames);
    }
}

fn compile_shader(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader, EngineError> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(EngineError::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(EngineError::ShaderCompile { stage, log })
    }
}

fn link_program(gl: &GL) -> Result<WebGlProgram, EngineError> {
    let vs = compile_shader(gl, ShaderStage::Vertex, shader::VERTEX_SHADER)?;
    let fs = match compile_shader(gl, ShaderStage::Fragment, shader::FRAGMENT_SHADER) {
        Ok(fs) => fs,
        Err(err) => {
            gl.delete_shader(Some(&vs));
            return Err(err);
        }
    };
    let program = gl
        .create_program()
        .ok_or(EngineError::Resource("program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);

    // shaders are owned by the program from here on
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(EngineError::ProgramLink { log })
    }
}

fn upload_quad(
    gl: &GL,
    program: &WebGlProgram,
) -> Result<(WebGlVertexArrayObject, WebGlBuffer), EngineError> {
    let vao = gl
        .create_vertex_array()
        .ok_or(EngineError::Resource("vertex array"))?;
    let buffer = match gl.create_buffer() {
        Some(buffer) => buffer,
        None => {
            gl.delete_vertex_array(Some(&vao));
            return Err(EngineError::Resource("buffer"));
        }
    };
    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let quad = js_sys::Float32Array::from(&shader::QUAD[..]);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &quad, GL::STATIC_DRAW);

    let location = gl.get_attrib_location(program, shader::POSITION_ATTRIBUTE);
    if location >= 0 {
        gl.enable_vertex_attrib_array(location as u32);
        gl.vertex_attrib_pointer_with_i32(location as u32, 2, GL::FLOAT, false, 0, 0);
    }
    gl.bind_vertex_array(None);
    Ok((vao, buffer))
}
