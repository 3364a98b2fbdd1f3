//! Text overlay rendering with glyphon.
//!
//! Owns every text buffer drawn over the 3D scene: the title banner and the
//! FPS readout. Buffers are keyed by string IDs so the frame loop can update
//! their contents without touching layout.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, Style,
    SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer as GlyphonTextRenderer, Viewport,
    Weight,
};
use std::collections::HashMap;
use wgpu::{self, Device, Queue, RenderPass, SurfaceConfiguration};
use winit::window::Window;

/// ID of the title banner buffer.
pub const TITLE_BUFFER: &str = "title";
/// ID of the FPS readout buffer.
pub const FPS_BUFFER: &str = "fps";

/// Visual style for one text buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
    pub color: Color,
    pub weight: Weight,
    pub style: Style,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "DejaVu Sans".to_string(), // Common system font
            font_size: 16.0,
            line_height: 20.0,
            color: Color::rgb(255, 255, 255),
            weight: Weight::NORMAL,
            style: Style::Normal,
        }
    }
}

/// Screen-space placement for one text buffer, in logical pixels from the
/// top-left corner.
#[derive(Debug, Clone, Default)]
pub struct TextPosition {
    pub x: f32,
    pub y: f32,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
}

/// A shaped text buffer plus its style and placement.
#[derive(Debug)]
pub struct TextBuffer {
    pub buffer: Buffer,
    pub style: TextStyle,
    pub position: TextPosition,
    pub scale: f32,
    pub visible: bool,
    pub text_content: String, // Stored so restyles can re-shape the text
}

/// Renderer for all text overlays.
pub struct TextRenderer {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    pub viewport: Viewport,
    pub atlas: TextAtlas,
    pub text_renderer: GlyphonTextRenderer,
    pub text_buffers: HashMap<String, TextBuffer>,
    pub window_scale_factor: f32,
    pub window_size: winit::dpi::PhysicalSize<u32>,
}

impl TextRenderer {
    /// Creates a new TextRenderer using system fonts.
    pub fn new(
        device: &Device,
        queue: &Queue,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        // FontSystem::new discovers installed system fonts; the default
        // style's family resolves through the fontdb fallback chain.
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, surface_format);
        let text_renderer =
            GlyphonTextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        let scale_factor = window.scale_factor() as f32;
        let size = window.inner_size();

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            text_renderer,
            text_buffers: HashMap::new(),
            window_scale_factor: scale_factor,
            window_size: size,
        }
    }

    /// Creates the title banner and FPS readout buffers.
    pub fn initialize_overlay(&mut self, width: u32, height: u32) {
        self.create_text_buffer(
            TITLE_BUFFER,
            "SOKOBAN",
            Some(Self::title_style()),
            Some(Self::title_position(width)),
        );
        self.create_text_buffer(
            FPS_BUFFER,
            "FPS: 0",
            Some(Self::fps_style()),
            Some(Self::fps_position(height)),
        );
    }

    /// Re-anchors the overlay buffers after a window resize.
    pub fn layout_overlay(&mut self, width: u32, height: u32) {
        if let Err(e) = self.update_position(TITLE_BUFFER, Self::title_position(width)) {
            println!("Failed to reposition title: {}", e);
        }
        if let Err(e) = self.update_position(FPS_BUFFER, Self::fps_position(height)) {
            println!("Failed to reposition FPS readout: {}", e);
        }
    }

    fn title_style() -> TextStyle {
        TextStyle {
            font_size: 42.0,
            line_height: 50.0,
            color: Color::rgb(235, 235, 235),
            weight: Weight::BOLD,
            ..TextStyle::default()
        }
    }

    /// Centered along the top edge.
    fn title_position(width: u32) -> TextPosition {
        TextPosition {
            x: (width as f32 / 2.0) - 95.0,
            y: 16.0,
            max_width: Some(300.0),
            max_height: Some(60.0),
        }
    }

    fn fps_style() -> TextStyle {
        TextStyle {
            font_size: 18.0,
            line_height: 22.0,
            color: Color::rgb(127, 204, 51),
            ..TextStyle::default()
        }
    }

    /// Anchored 25 pixels in from the left and bottom edges.
    fn fps_position(height: u32) -> TextPosition {
        TextPosition {
            x: 25.0,
            y: height as f32 - 47.0,
            max_width: Some(200.0),
            max_height: Some(25.0),
        }
    }

    /// Create a new text buffer with the given ID, text, style, and position
    pub fn create_text_buffer(
        &mut self,
        id: &str,
        text: &str,
        style: Option<TextStyle>,
        position: Option<TextPosition>,
    ) {
        let style = style.unwrap_or_default();
        let position = position.unwrap_or_default();

        let metrics = Metrics::new(style.font_size, style.line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        // Set buffer size based on position constraints or window size
        let width = position.max_width.unwrap_or(self.window_size.width as f32);
        let height = position
            .max_height
            .unwrap_or(self.window_size.height as f32);
        buffer.set_size(&mut self.font_system, Some(width), Some(height));

        let attrs = Attrs::new()
            .family(Family::Name(&style.font_family))
            .weight(style.weight)
            .style(style.style);

        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let text_buffer = TextBuffer {
            buffer,
            style,
            position,
            scale: 1.0,
            visible: true,
            text_content: text.to_string(),
        };

        self.text_buffers.insert(id.to_string(), text_buffer);
    }

    /// Update the text content of an existing buffer
    pub fn update_text(&mut self, id: &str, text: &str) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        if text_buffer.text_content == text {
            return Ok(());
        }

        let attrs = Attrs::new()
            .family(Family::Name(&text_buffer.style.font_family))
            .weight(text_buffer.style.weight)
            .style(text_buffer.style.style);

        text_buffer
            .buffer
            .set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        text_buffer
            .buffer
            .shape_until_scroll(&mut self.font_system, false);

        text_buffer.text_content = text.to_string();
        Ok(())
    }

    /// Update the position of an existing buffer
    pub fn update_position(&mut self, id: &str, position: TextPosition) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        // Update buffer size if max dimensions changed
        if text_buffer.position.max_width != position.max_width
            || text_buffer.position.max_height != position.max_height
        {
            let width = position.max_width.unwrap_or(self.window_size.width as f32);
            let height = position
                .max_height
                .unwrap_or(self.window_size.height as f32);
            text_buffer
                .buffer
                .set_size(&mut self.font_system, Some(width), Some(height));
        }

        text_buffer.position = position;
        Ok(())
    }

    /// Resize the viewport and atlas
    pub fn resize(&mut self, queue: &Queue, resolution: Resolution) {
        self.window_size = winit::dpi::PhysicalSize::new(resolution.width, resolution.height);
        self.viewport.update(queue, resolution);
    }

    /// Prepare text rendering for the current frame
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface_config: &SurfaceConfiguration,
    ) -> Result<(), glyphon::PrepareError> {
        // Collect all visible text areas
        let text_areas: Vec<TextArea> = self
            .text_buffers
            .iter()
            .filter(|(_, buffer)| buffer.visible)
            .map(|(_, buffer)| TextArea {
                buffer: &buffer.buffer,
                left: buffer.position.x,
                top: buffer.position.y,
                scale: buffer.scale * self.window_scale_factor,
                bounds: TextBounds {
                    left: buffer.position.x as i32,
                    top: buffer.position.y as i32,
                    right: (buffer.position.x
                        + buffer
                            .position
                            .max_width
                            .unwrap_or(surface_config.width as f32))
                        as i32,
                    bottom: (buffer.position.y
                        + buffer
                            .position
                            .max_height
                            .unwrap_or(surface_config.height as f32))
                        as i32,
                },
                default_color: buffer.style.color,
                custom_glyphs: &[],
            })
            .collect();

        // Prepare the text renderer
        self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )?;

        Ok(())
    }

    /// Render all visible text buffers
    pub fn render(&mut self, render_pass: &mut RenderPass) -> Result<(), glyphon::RenderError> {
        self.text_renderer
            .render(&self.atlas, &self.viewport, render_pass)?;
        Ok(())
    }

    /// Trim the atlas to free up unused space
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
