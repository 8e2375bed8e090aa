//! Glyph outline extraction.
//!
//! An [`OutlineSource`] turns a string into a stream of [`PathCommand`]s in a
//! y-down coordinate space (as `rusttype` emits it), already scaled to the
//! requested size. In that space TrueType outer contours wind with positive
//! area and holes with negative area.

use rusttype::{Font, OutlineBuilder, Scale};
use sealtag_core::Point2D;
use sealtag_settings::FontSettings;
use tracing::debug;

use crate::error::FontError;
use crate::font_manager;

/// One drawing instruction of a glyph outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2D),
    LineTo(Point2D),
    QuadTo { ctrl: Point2D, to: Point2D },
    CubicTo { ctrl1: Point2D, ctrl2: Point2D, to: Point2D },
    Close,
}

impl PathCommand {
    fn translated(self, dx: f64, dy: f64) -> Self {
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(p.translated(dx, dy)),
            PathCommand::LineTo(p) => PathCommand::LineTo(p.translated(dx, dy)),
            PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo {
                ctrl: ctrl.translated(dx, dy),
                to: to.translated(dx, dy),
            },
            PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                ctrl1: ctrl1.translated(dx, dy),
                ctrl2: ctrl2.translated(dx, dy),
                to: to.translated(dx, dy),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// Outline of a laid-out string plus the metrics needed to center it.
///
/// `ascender` is above the baseline (positive) and `descender` below it
/// (usually negative), in font convention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOutline {
    pub commands: Vec<PathCommand>,
    pub advance_width: f64,
    pub ascender: f64,
    pub descender: f64,
}

impl TextOutline {
    /// Moves the outline so the pen run is centered on x = 0 and the
    /// ascender/descender band is centered on y = 0.
    pub fn centered(self) -> Self {
        let dx = -self.advance_width / 2.0;
        // baseline sits at y = 0 with y pointing down
        let dy = (self.ascender + self.descender) / 2.0;
        Self {
            commands: self
                .commands
                .into_iter()
                .map(|c| c.translated(dx, dy))
                .collect(),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Produces glyph outlines for a string at a nominal size
pub trait OutlineSource {
    fn outline(&self, text: &str, size: f64) -> Result<TextOutline, FontError>;
}

/// Outline source backed by a font installed on the host
pub struct SystemFontSource {
    font: &'static Font<'static>,
}

impl SystemFontSource {
    /// Resolves the configured font, or the first well-known system font
    pub fn from_settings(settings: &FontSettings) -> Result<Self, FontError> {
        Ok(Self {
            font: font_manager::resolve(settings)?,
        })
    }

    pub fn new(font: &'static Font<'static>) -> Self {
        Self { font }
    }
}

impl OutlineSource for SystemFontSource {
    fn outline(&self, text: &str, size: f64) -> Result<TextOutline, FontError> {
        let scale = Scale::uniform(size as f32);
        let v_metrics = self.font.v_metrics(scale);

        let mut sink = CommandSink::default();
        let mut pen = 0.0f32;
        let mut previous = None;
        for c in text.chars() {
            let glyph = self.font.glyph(c).scaled(scale);
            if let Some(prev) = previous {
                pen += self.font.pair_kerning(scale, prev, glyph.id());
            }
            sink.offset_x = pen as f64;
            glyph.build_outline(&mut sink);
            pen += glyph.h_metrics().advance_width;
            previous = Some(glyph.id());
        }

        debug!(
            "Outlined {:?}: {} commands, advance {:.3}",
            text,
            sink.commands.len(),
            pen
        );
        Ok(TextOutline {
            commands: sink.commands,
            advance_width: pen as f64,
            ascender: v_metrics.ascent as f64,
            descender: v_metrics.descent as f64,
        })
    }
}

/// Collects rusttype outline callbacks as path commands, shifted by the pen
#[derive(Default)]
struct CommandSink {
    commands: Vec<PathCommand>,
    offset_x: f64,
}

impl CommandSink {
    fn point(&self, x: f32, y: f32) -> Point2D {
        Point2D::new(x as f64 + self.offset_x, y as f64)
    }
}

impl OutlineBuilder for CommandSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.commands.push(PathCommand::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.commands.push(PathCommand::LineTo(p));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (ctrl, to) = (self.point(x1, y1), self.point(x, y));
        self.commands.push(PathCommand::QuadTo { ctrl, to });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (ctrl1, ctrl2, to) = (self.point(x1, y1), self.point(x2, y2), self.point(x, y));
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}
