/// A 2D surface that can paint filled shapes.
///
/// Coordinates are pixels with the origin at the top-left corner and y growing
/// downward. Colors are `[r, g, b]` in `[0, 1]`.
pub trait Canvas {
    /// Paint the whole surface.
    fn fill_background(&mut self, color: [f32; 3]);

    /// Paint an axis-aligned filled ellipse.
    fn fill_ellipse(&mut self, center: [f32; 2], radii: [f32; 2], color: [f32; 3]);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    pub center: [f32; 2],
    pub radii: [f32; 2],
    pub color: [f32; 3],
}

impl Ellipse {
    pub fn contains(&self, point: [f32; 2]) -> bool {
        if self.radii[0] <= 0.0 || self.radii[1] <= 0.0 {
            return false;
        }
        let dx = (point[0] - self.center[0]) / self.radii[0];
        let dy = (point[1] - self.center[1]) / self.radii[1];
        dx * dx + dy * dy <= 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Clear { color: [f32; 3] },
    Ellipse(Ellipse),
}

/// Records draw calls in order so a backend can replay them later.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Background color after the last clear, if any.
    pub fn background(&self) -> Option<[f32; 3]> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            DrawCommand::Clear { color } => Some(*color),
            DrawCommand::Ellipse(_) => None,
        })
    }

    /// Ellipses still visible, i.e. drawn after the last clear.
    pub fn visible_ellipses(&self) -> impl Iterator<Item = &Ellipse> {
        let start = self
            .commands
            .iter()
            .rposition(|cmd| matches!(cmd, DrawCommand::Clear { .. }))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|cmd| match cmd {
            DrawCommand::Ellipse(e) => Some(e),
            DrawCommand::Clear { .. } => None,
        })
    }

    /// Resolve the color a pixel ends up with, painter's-algorithm style.
    pub fn sample(&self, point: [f32; 2]) -> Option<[f32; 3]> {
        self.visible_ellipses()
            .filter(|e| e.contains(point))
            .last()
            .map(|e| e.color)
            .or_else(|| self.background())
    }
}

impl Canvas for DrawList {
    fn fill_background(&mut self, color: [f32; 3]) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_ellipse(&mut self, center: [f32; 2], radii: [f32; 2], color: [f32; 3]) {
        self.commands.push(DrawCommand::Ellipse(Ellipse {
            center,
            radii,
            color,
        }));
    }
}
